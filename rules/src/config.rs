//! Containers the rule compiler (and the network endpoint) wrap rule lists in.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    decode::decode_many,
    err::{DecodeError, Response},
    model::Rule,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u32,
    #[serde(default)]
    pub default: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagByName {
    #[serde(flatten)]
    pub tag: Tag,
    #[serde(default)]
    pub enums: BTreeMap<String, u32>,
    #[serde(default)]
    pub flags: BTreeMap<String, u32>,
}

/// A numbered group of rules that can be granted to members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Capability {
    pub id: u32,
    pub default: bool,
    pub rules: Vec<Rule>,
}

#[derive(Deserialize)]
struct RawCapability {
    id: u32,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    rules: Option<Vec<Value>>,
}

impl TryFrom<RawCapability> for Capability {
    type Error = DecodeError;

    fn try_from(value: RawCapability) -> Result<Self, Self::Error> {
        let rules = decode_many(value.rules.as_deref().unwrap_or_default()).map_err(|e| {
            DecodeError::Capability {
                id: value.id,
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            id: value.id,
            default: value.default,
            rules,
        })
    }
}

/// The base rules of a network together with its tags and capabilities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub tags: Vec<Tag>,
    pub capabilities: Vec<Capability>,
}

impl RuleSet {
    /// Reads a `{"rules": [...], "tags": [...], "capabilities": [...]}` object.
    ///
    /// `rules` is required; the other sections default to empty when absent or null.
    pub fn decode(payload: &Value) -> Response<Self> {
        let fields = payload.as_object().ok_or(DecodeError::Section {
            key: "config",
            expected: "an object",
        })?;

        let rules = fields
            .get("rules")
            .and_then(Value::as_array)
            .ok_or(DecodeError::Section {
                key: "rules",
                expected: "an array of rule records",
            })?;

        let rules = decode_many(rules)?;
        let tags: Vec<Tag> = section(fields, "tags", "an array of tags")?.unwrap_or_default();
        let capabilities = section::<Vec<RawCapability>>(
            fields,
            "capabilities",
            "an array of capabilities",
        )?
        .unwrap_or_default()
        .into_iter()
        .map(Capability::try_from)
        .collect::<Response<Vec<_>>>()?;

        Ok(Self {
            rules,
            tags,
            capabilities,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.tags.is_empty() && self.capabilities.is_empty()
    }
}

/// Full compiler output. The network read endpoint returns the same shape,
/// so it decodes through here as well.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOutput {
    pub config: RuleSet,
    pub tags_by_name: BTreeMap<String, TagByName>,
    pub capabilities_by_name: BTreeMap<String, u32>,
}

impl CompilerOutput {
    pub fn decode(payload: &Value) -> Response<Self> {
        let fields = payload.as_object().ok_or(DecodeError::Section {
            key: "payload",
            expected: "an object",
        })?;

        let config = fields.get("config").ok_or(DecodeError::Section {
            key: "config",
            expected: "present",
        })?;

        Ok(Self {
            config: RuleSet::decode(config)?,
            tags_by_name: section(fields, "tagsByName", "a map of tags")?.unwrap_or_default(),
            capabilities_by_name: section(fields, "capabilitiesByName", "a map of capability ids")?
                .unwrap_or_default(),
        })
    }
}

fn section<T>(
    fields: &Map<String, Value>,
    key: &'static str,
    expected: &'static str,
) -> Response<Option<T>>
where
    T: DeserializeOwned,
{
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(raw) => T::deserialize(raw)
            .map(Some)
            .map_err(|_| DecodeError::Section { key, expected }),
    }
}
