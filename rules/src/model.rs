use std::{fmt::Display, str::FromStr};

use ipnet::{Ipv4Net, Ipv6Net};
use serde::{Serialize, Serializer};

use crate::kind::Kind;

/// One decoded rule element: the shared header plus the variant payload.
///
/// Serializes back to the tagged record it was decoded from, e.g.
/// `{"type": "MATCH_IP_PROTOCOL", "ipProtocol": 6, "not": false}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rule {
    #[serde(flatten)]
    pub body: RuleBody,
    #[serde(rename = "not")]
    pub negate: bool,
}

impl Rule {
    pub fn new(body: RuleBody) -> Self {
        Self { body, negate: false }
    }

    pub fn negated(body: RuleBody) -> Self {
        Self { body, negate: true }
    }

    pub fn kind(&self) -> Kind {
        self.body.kind()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum RuleBody {
    #[serde(rename = "ACTION_DROP")]
    ActionDrop,
    #[serde(rename = "ACTION_ACCEPT")]
    ActionAccept,
    #[serde(rename = "ACTION_BREAK")]
    ActionBreak,
    #[serde(rename = "ACTION_TEE")]
    ActionTee { address: NodeAddress, length: u32 },
    #[serde(rename = "ACTION_REDIRECT")]
    ActionRedirect { address: NodeAddress },
    #[serde(rename = "ACTION_DEBUG_LOG")]
    ActionDebugLog,

    #[serde(rename = "MATCH_SOURCE_ZEROTIER_ADDRESS")]
    MatchSourceZerotierAddress { zt: NodeAddress },
    #[serde(rename = "MATCH_DEST_ZEROTIER_ADDRESS")]
    MatchDestZerotierAddress { zt: NodeAddress },

    #[serde(rename = "MATCH_ETHERTYPE")]
    MatchEthertype {
        #[serde(rename = "etherType")]
        ether_type: EtherType,
    },
    #[serde(rename = "MATCH_MAC_SOURCE")]
    MatchMacSource { mac: MacAddress },
    #[serde(rename = "MATCH_MAC_DEST")]
    MatchMacDest { mac: MacAddress },

    #[serde(rename = "MATCH_IPV4_SOURCE")]
    MatchIpv4Source { ip: Ipv4Net },
    #[serde(rename = "MATCH_IPV4_DEST")]
    MatchIpv4Dest { ip: Ipv4Net },
    #[serde(rename = "MATCH_IPV6_SOURCE")]
    MatchIpv6Source { ip: Ipv6Net },
    #[serde(rename = "MATCH_IPV6_DEST")]
    MatchIpv6Dest { ip: Ipv6Net },

    #[serde(rename = "MATCH_IP_TOS")]
    MatchIpTos { mask: u8, start: u8, end: u8 },
    #[serde(rename = "MATCH_IP_PROTOCOL")]
    MatchIpProtocol {
        #[serde(rename = "ipProtocol")]
        ip_protocol: u8,
    },

    #[serde(rename = "MATCH_IP_SOURCE_PORT_RANGE")]
    MatchIpSourcePortRange { start: u16, end: u16 },
    #[serde(rename = "MATCH_IP_DEST_PORT_RANGE")]
    MatchIpDestPortRange { start: u16, end: u16 },
    #[serde(rename = "MATCH_FRAME_SIZE_RANGE")]
    MatchFrameSizeRange { start: u16, end: u16 },

    #[serde(rename = "MATCH_CHARACTERISTICS")]
    MatchCharacteristics {
        mask: CharacteristicsMask,
        value: i64,
    },

    #[serde(rename = "MATCH_TAGS_SAMENESS")]
    MatchTagsSameness { id: u32, value: u32 },
    #[serde(rename = "MATCH_TAGS_BITWISE_AND")]
    MatchTagsBitwiseAnd { id: u32, value: u32 },
    #[serde(rename = "MATCH_TAGS_BITWISE_OR")]
    MatchTagsBitwiseOr { id: u32, value: u32 },
    #[serde(rename = "MATCH_TAGS_BITWISE_XOR")]
    MatchTagsBitwiseXor { id: u32, value: u32 },

    #[serde(rename = "MATCH_RANDOM")]
    MatchRandom { probability: u32 },
    #[serde(rename = "MATCH_ICMP")]
    MatchIcmp {
        #[serde(rename = "icmpType")]
        icmp_type: u8,
        /// `None` (`null` on the wire) matches any code.
        #[serde(rename = "icmpCode")]
        icmp_code: Option<u8>,
    },
}

impl RuleBody {
    pub fn kind(&self) -> Kind {
        match self {
            Self::ActionDrop => Kind::ActionDrop,
            Self::ActionAccept => Kind::ActionAccept,
            Self::ActionBreak => Kind::ActionBreak,
            Self::ActionTee { .. } => Kind::ActionTee,
            Self::ActionRedirect { .. } => Kind::ActionRedirect,
            Self::ActionDebugLog => Kind::ActionDebugLog,
            Self::MatchSourceZerotierAddress { .. } => Kind::MatchSourceZerotierAddress,
            Self::MatchDestZerotierAddress { .. } => Kind::MatchDestZerotierAddress,
            Self::MatchEthertype { .. } => Kind::MatchEthertype,
            Self::MatchMacSource { .. } => Kind::MatchMacSource,
            Self::MatchMacDest { .. } => Kind::MatchMacDest,
            Self::MatchIpv4Source { .. } => Kind::MatchIpv4Source,
            Self::MatchIpv4Dest { .. } => Kind::MatchIpv4Dest,
            Self::MatchIpv6Source { .. } => Kind::MatchIpv6Source,
            Self::MatchIpv6Dest { .. } => Kind::MatchIpv6Dest,
            Self::MatchIpTos { .. } => Kind::MatchIpTos,
            Self::MatchIpProtocol { .. } => Kind::MatchIpProtocol,
            Self::MatchIpSourcePortRange { .. } => Kind::MatchIpSourcePortRange,
            Self::MatchIpDestPortRange { .. } => Kind::MatchIpDestPortRange,
            Self::MatchFrameSizeRange { .. } => Kind::MatchFrameSizeRange,
            Self::MatchCharacteristics { .. } => Kind::MatchCharacteristics,
            Self::MatchTagsSameness { .. } => Kind::MatchTagsSameness,
            Self::MatchTagsBitwiseAnd { .. } => Kind::MatchTagsBitwiseAnd,
            Self::MatchTagsBitwiseOr { .. } => Kind::MatchTagsBitwiseOr,
            Self::MatchTagsBitwiseXor { .. } => Kind::MatchTagsBitwiseXor,
            Self::MatchRandom { .. } => Kind::MatchRandom,
            Self::MatchIcmp { .. } => Kind::MatchIcmp,
        }
    }
}

/// A 40-bit ZeroTier node address, written as ten hex digits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeAddress(u64);

impl NodeAddress {
    pub const MAX: u64 = 0xff_ffff_ffff;

    pub fn new(raw: u64) -> Option<Self> {
        (raw <= Self::MAX).then_some(Self(raw))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl FromStr for NodeAddress {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 10 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(());
        }

        u64::from_str_radix(s, 16).map(Self).map_err(|_| ())
    }
}

impl Display for NodeAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:010x}", self.0)
    }
}

/// A 16-bit ethernet frame type, e.g. `2048` for IPv4.
///
/// Read from a number or from a decimal or `0x` hex string, always written as a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EtherType(pub u16);

impl FromStr for EtherType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => s.parse(),
        };

        parsed.map(Self).map_err(|_| ())
    }
}

impl Display for EtherType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

/// An ethernet MAC address. Accepts `:` or `-` separators, always prints `:`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; 6]);

impl FromStr for MacAddress {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split([':', '-']).collect();

        if parts.len() != 6 {
            return Err(());
        }

        let mut octets = [0u8; 6];
        for (octet, part) in octets.iter_mut().zip(parts) {
            if part.len() != 2 {
                return Err(());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| ())?;
        }

        Ok(Self(octets))
    }
}

impl Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Bitmask over the packet characteristics flags, e.g. `"0000000000000002"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CharacteristicsMask(pub u64);

impl FromStr for CharacteristicsMask {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(());
        }

        u64::from_str_radix(s, 16).map(Self).map_err(|_| ())
    }
}

impl Display for CharacteristicsMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

macro_rules! serialize_as_display {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }
        )*
    };
}

serialize_as_display!(NodeAddress, MacAddress, CharacteristicsMask);
