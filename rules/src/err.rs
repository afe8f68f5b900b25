use std::fmt::Display;

use crate::kind::Kind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The record was not a JSON object.
    NotARecord,
    /// The record carried no string `type` key.
    MissingDiscriminator,
    UnknownDiscriminator(String),
    MissingField {
        kind: Kind,
        field: &'static str,
    },
    MalformedField {
        kind: Kind,
        field: &'static str,
        expected: &'static str,
    },
    /// Positional wrapper added by `decode_many`.
    Item {
        index: usize,
        source: Box<DecodeError>,
    },
    /// A rule inside a capability failed to decode.
    Capability {
        id: u32,
        source: Box<DecodeError>,
    },
    /// A container section (`rules`, `tags`, ...) was absent or had the wrong shape.
    Section {
        key: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// The discriminator of the record that failed, when one was read.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::UnknownDiscriminator(kind) => Some(kind.as_str()),
            Self::MissingField { kind, .. } | Self::MalformedField { kind, .. } => {
                Some(kind.as_str())
            }
            Self::Item { source, .. } | Self::Capability { source, .. } => source.kind(),
            Self::NotARecord | Self::MissingDiscriminator | Self::Section { .. } => None,
        }
    }

    /// The position of the failing record within its list, when known.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Item { index, .. } => Some(*index),
            Self::Capability { source, .. } => source.index(),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotARecord => write!(f, "Rule record is not a JSON object"),
            Self::MissingDiscriminator => write!(f, "Rule record has no string `type` field"),
            Self::UnknownDiscriminator(kind) => write!(f, "Unknown rule type: {kind}"),
            Self::MissingField { kind, field } => {
                write!(f, "{kind}: missing field `{field}`")
            }
            Self::MalformedField {
                kind,
                field,
                expected,
            } => write!(f, "{kind}: field `{field}` is not a valid {expected}"),
            Self::Item { index, source } => write!(f, "Rule #{index}: {source}"),
            Self::Capability { id, source } => write!(f, "Capability {id}: {source}"),
            Self::Section { key, expected } => write!(f, "`{key}` must be {expected}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Item { source, .. } | Self::Capability { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

pub type Response<T> = Result<T, DecodeError>;
