use std::net::{Ipv4Addr, Ipv6Addr};

use ipnet::{Ipv4Net, Ipv6Net};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    err::{DecodeError, Response},
    kind::Kind,
    model::{CharacteristicsMask, EtherType, MacAddress, NodeAddress, Rule, RuleBody},
};

/// A JSON value that can fill a declared rule field.
trait Field: Sized {
    /// Shown in `MalformedField` errors.
    const EXPECTED: &'static str;

    fn from_json(value: &Value) -> Option<Self>;
}

macro_rules! unsigned_field {
    ($($ty:ty => $name:literal),*) => {
        $(
            impl Field for $ty {
                const EXPECTED: &'static str = $name;

                fn from_json(value: &Value) -> Option<Self> {
                    value.as_u64().and_then(|it| Self::try_from(it).ok())
                }
            }
        )*
    };
}

unsigned_field!(u8 => "uint8", u16 => "uint16", u32 => "uint32");

impl Field for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_i64()
    }
}

impl Field for bool {
    const EXPECTED: &'static str = "boolean";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Field for String {
    const EXPECTED: &'static str = "string";

    fn from_json(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

macro_rules! parsed_field {
    ($($ty:ty => $name:literal),*) => {
        $(
            impl Field for $ty {
                const EXPECTED: &'static str = $name;

                fn from_json(value: &Value) -> Option<Self> {
                    value.as_str()?.parse().ok()
                }
            }
        )*
    };
}

parsed_field!(
    NodeAddress => "ZeroTier address",
    MacAddress => "MAC address",
    CharacteristicsMask => "hex bitmask"
);

impl Field for EtherType {
    const EXPECTED: &'static str = "ethertype";

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => text.parse().ok(),
            other => u16::from_json(other).map(Self),
        }
    }
}

// A bare address is a host route.
impl Field for Ipv4Net {
    const EXPECTED: &'static str = "IPv4 network";

    fn from_json(value: &Value) -> Option<Self> {
        let text = value.as_str()?;
        text.parse().ok().or_else(|| {
            let addr: Ipv4Addr = text.parse().ok()?;
            Self::new(addr, 32).ok()
        })
    }
}

impl Field for Ipv6Net {
    const EXPECTED: &'static str = "IPv6 network";

    fn from_json(value: &Value) -> Option<Self> {
        let text = value.as_str()?;
        text.parse().ok().or_else(|| {
            let addr: Ipv6Addr = text.parse().ok()?;
            Self::new(addr, 128).ok()
        })
    }
}

/// A record whose discriminator has been resolved.
struct Record<'a> {
    kind: Kind,
    fields: &'a Map<String, Value>,
}

impl Record<'_> {
    fn get<T: Field>(&self, field: &'static str) -> Response<T> {
        let raw = self.fields.get(field).ok_or(DecodeError::MissingField {
            kind: self.kind,
            field,
        })?;

        T::from_json(raw).ok_or(DecodeError::MalformedField {
            kind: self.kind,
            field,
            expected: T::EXPECTED,
        })
    }

    /// An absent or `null` field reads as `None`.
    fn get_optional<T: Field>(&self, field: &'static str) -> Response<Option<T>> {
        match self.fields.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(field).map(Some),
        }
    }

    fn get_or_default<T: Field + Default>(&self, field: &'static str) -> Response<T> {
        Ok(self.get_optional(field)?.unwrap_or_default())
    }

    fn body(&self) -> Response<RuleBody> {
        let body = match self.kind {
            Kind::ActionDrop => RuleBody::ActionDrop,
            Kind::ActionAccept => RuleBody::ActionAccept,
            Kind::ActionBreak => RuleBody::ActionBreak,
            Kind::ActionDebugLog => RuleBody::ActionDebugLog,
            Kind::ActionTee => RuleBody::ActionTee {
                address: self.get("address")?,
                length: self.get("length")?,
            },
            Kind::ActionRedirect => RuleBody::ActionRedirect {
                address: self.get("address")?,
            },
            Kind::MatchSourceZerotierAddress => RuleBody::MatchSourceZerotierAddress {
                zt: self.get("zt")?,
            },
            Kind::MatchDestZerotierAddress => RuleBody::MatchDestZerotierAddress {
                zt: self.get("zt")?,
            },
            Kind::MatchEthertype => RuleBody::MatchEthertype {
                ether_type: self.get("etherType")?,
            },
            Kind::MatchMacSource => RuleBody::MatchMacSource {
                mac: self.get("mac")?,
            },
            Kind::MatchMacDest => RuleBody::MatchMacDest {
                mac: self.get("mac")?,
            },
            Kind::MatchIpv4Source => RuleBody::MatchIpv4Source { ip: self.get("ip")? },
            Kind::MatchIpv4Dest => RuleBody::MatchIpv4Dest { ip: self.get("ip")? },
            Kind::MatchIpv6Source => RuleBody::MatchIpv6Source { ip: self.get("ip")? },
            Kind::MatchIpv6Dest => RuleBody::MatchIpv6Dest { ip: self.get("ip")? },
            Kind::MatchIpTos => RuleBody::MatchIpTos {
                mask: self.get("mask")?,
                start: self.get("start")?,
                end: self.get("end")?,
            },
            Kind::MatchIpProtocol => RuleBody::MatchIpProtocol {
                ip_protocol: self.get("ipProtocol")?,
            },
            Kind::MatchIpSourcePortRange => RuleBody::MatchIpSourcePortRange {
                start: self.get("start")?,
                end: self.get("end")?,
            },
            Kind::MatchIpDestPortRange => RuleBody::MatchIpDestPortRange {
                start: self.get("start")?,
                end: self.get("end")?,
            },
            Kind::MatchFrameSizeRange => RuleBody::MatchFrameSizeRange {
                start: self.get("start")?,
                end: self.get("end")?,
            },
            Kind::MatchCharacteristics => RuleBody::MatchCharacteristics {
                mask: self.get("mask")?,
                value: self.get("value")?,
            },
            Kind::MatchTagsSameness => RuleBody::MatchTagsSameness {
                id: self.get("id")?,
                value: self.get("value")?,
            },
            Kind::MatchTagsBitwiseAnd => RuleBody::MatchTagsBitwiseAnd {
                id: self.get("id")?,
                value: self.get("value")?,
            },
            Kind::MatchTagsBitwiseOr => RuleBody::MatchTagsBitwiseOr {
                id: self.get("id")?,
                value: self.get("value")?,
            },
            Kind::MatchTagsBitwiseXor => RuleBody::MatchTagsBitwiseXor {
                id: self.get("id")?,
                value: self.get("value")?,
            },
            Kind::MatchRandom => RuleBody::MatchRandom {
                probability: self.get("probability")?,
            },
            Kind::MatchIcmp => RuleBody::MatchIcmp {
                icmp_type: self.get("icmpType")?,
                icmp_code: self.get_optional("icmpCode")?,
            },
        };

        Ok(body)
    }
}

/// Resolves one tagged record into its rule variant.
///
/// Extra keys are ignored. `not` may be omitted or `null` and then reads as `false`.
pub fn decode_one(record: &Value) -> Response<Rule> {
    let fields = record.as_object().ok_or(DecodeError::NotARecord)?;

    let tag = fields
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingDiscriminator)?;

    let kind: Kind = tag
        .parse()
        .map_err(|()| DecodeError::UnknownDiscriminator(tag.to_owned()))?;

    let record = Record { kind, fields };
    let negate = record.get_or_default("not")?;
    let body = record.body()?;

    debug!(%kind, negate, "decoded rule");

    Ok(Rule { body, negate })
}

/// Decodes every record in order. The first failure aborts the whole list.
#[tracing::instrument(skip_all, fields(count = records.len()))]
pub fn decode_many(records: &[Value]) -> Response<Vec<Rule>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            decode_one(record).map_err(|e| {
                warn!(index, "aborting rule list: {e}");
                DecodeError::Item {
                    index,
                    source: Box::new(e),
                }
            })
        })
        .collect()
}
