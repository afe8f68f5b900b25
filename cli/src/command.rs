use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pool::{cidr_to_range, smallest_cidr_string, IpRange};
use rules::{decode_many, CompilerOutput, RuleSet};
use serde_json::Value;
use tracing::info;
use traits::json::read_value;

/// Decode ZeroTier flow rules and convert address pools.
#[derive(Debug, Parser)]
#[command(name = "ztcodec")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Decode compiled rules and print them back
    Rules {
        /// A rule list, rule set or compiler output in JSON
        path: PathBuf,
    },
    /// Print the allocation pool for a CIDR
    Pool { cidr: String },
    /// Print the smallest CIDR holding a range
    Cidr { first: String, last: String },
}

impl Command {
    pub fn run(&self) -> anyhow::Result<Value> {
        match self {
            Self::Rules { path } => {
                let document =
                    read_value(path).with_context(|| format!("Reading {}", path.display()))?;
                decode_document(&document)
            }
            Self::Pool { cidr } => {
                let pool = cidr_to_range(cidr)?;
                info!(%pool, "resolved pool");
                Ok(serde_json::to_value(pool)?)
            }
            Self::Cidr { first, last } => {
                let range = IpRange::from_bounds(first, last)?;
                Ok(Value::String(smallest_cidr_string(range.first, range.last)))
            }
        }
    }
}

/// Accepts a bare rule array, a `{"rules": [...]}` rule set, or a full
/// compiler output / network payload with the rule set under `config`.
pub fn decode_document(document: &Value) -> anyhow::Result<Value> {
    let decoded = match document {
        Value::Array(records) => {
            let rules = decode_many(records)?;
            info!(rules = rules.len(), "decoded rule list");
            serde_json::to_value(rules)?
        }
        Value::Object(fields) if fields.contains_key("config") => {
            let output = CompilerOutput::decode(document)?;
            info!(
                rules = output.config.rules.len(),
                capabilities = output.config.capabilities.len(),
                "decoded compiler output"
            );
            serde_json::to_value(output)?
        }
        _ => {
            let set = RuleSet::decode(document)?;
            info!(
                rules = set.rules.len(),
                capabilities = set.capabilities.len(),
                "decoded rule set"
            );
            serde_json::to_value(set)?
        }
    };

    Ok(decoded)
}
