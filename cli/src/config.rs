use serde::{Deserialize, Serialize};
use tracing::Level;
use traits::json::JsonSync;

pub const CONFIG_FILE: &str = "ztcodec.json";
pub const CONFIG_ENV: &str = "ZTCODEC_CONFIG";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub log_level: String,
    pub pretty: bool,
}

impl JsonSync for Config {
    type T = Self;

    fn new() -> Self::T {
        Self {
            log_level: "info".to_owned(),
            pretty: true,
        }
    }

    fn is_empty(this: &Self::T) -> bool {
        this.log_level.is_empty()
    }
}

impl Config {
    /// Unknown or empty levels fall back to `info`.
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }

    pub fn render<T: Serialize>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}
