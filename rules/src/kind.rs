use std::{fmt::Display, str::FromStr};

/// The discriminator carried in the `type` field of every rule record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    ActionDrop,
    ActionAccept,
    ActionBreak,
    ActionTee,
    ActionRedirect,
    ActionDebugLog,
    MatchSourceZerotierAddress,
    MatchDestZerotierAddress,
    MatchEthertype,
    MatchMacSource,
    MatchMacDest,
    MatchIpv4Source,
    MatchIpv4Dest,
    MatchIpv6Source,
    MatchIpv6Dest,
    MatchIpTos,
    MatchIpProtocol,
    MatchIpSourcePortRange,
    MatchIpDestPortRange,
    MatchCharacteristics,
    MatchFrameSizeRange,
    MatchTagsSameness,
    MatchTagsBitwiseAnd,
    MatchTagsBitwiseOr,
    MatchTagsBitwiseXor,
    MatchRandom,
    MatchIcmp,
}

impl Kind {
    pub const ALL: [Self; 27] = [
        Self::ActionDrop,
        Self::ActionAccept,
        Self::ActionBreak,
        Self::ActionTee,
        Self::ActionRedirect,
        Self::ActionDebugLog,
        Self::MatchSourceZerotierAddress,
        Self::MatchDestZerotierAddress,
        Self::MatchEthertype,
        Self::MatchMacSource,
        Self::MatchMacDest,
        Self::MatchIpv4Source,
        Self::MatchIpv4Dest,
        Self::MatchIpv6Source,
        Self::MatchIpv6Dest,
        Self::MatchIpTos,
        Self::MatchIpProtocol,
        Self::MatchIpSourcePortRange,
        Self::MatchIpDestPortRange,
        Self::MatchCharacteristics,
        Self::MatchFrameSizeRange,
        Self::MatchTagsSameness,
        Self::MatchTagsBitwiseAnd,
        Self::MatchTagsBitwiseOr,
        Self::MatchTagsBitwiseXor,
        Self::MatchRandom,
        Self::MatchIcmp,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ActionDrop => "ACTION_DROP",
            Self::ActionAccept => "ACTION_ACCEPT",
            Self::ActionBreak => "ACTION_BREAK",
            Self::ActionTee => "ACTION_TEE",
            Self::ActionRedirect => "ACTION_REDIRECT",
            Self::ActionDebugLog => "ACTION_DEBUG_LOG",
            Self::MatchSourceZerotierAddress => "MATCH_SOURCE_ZEROTIER_ADDRESS",
            Self::MatchDestZerotierAddress => "MATCH_DEST_ZEROTIER_ADDRESS",
            Self::MatchEthertype => "MATCH_ETHERTYPE",
            Self::MatchMacSource => "MATCH_MAC_SOURCE",
            Self::MatchMacDest => "MATCH_MAC_DEST",
            Self::MatchIpv4Source => "MATCH_IPV4_SOURCE",
            Self::MatchIpv4Dest => "MATCH_IPV4_DEST",
            Self::MatchIpv6Source => "MATCH_IPV6_SOURCE",
            Self::MatchIpv6Dest => "MATCH_IPV6_DEST",
            Self::MatchIpTos => "MATCH_IP_TOS",
            Self::MatchIpProtocol => "MATCH_IP_PROTOCOL",
            Self::MatchIpSourcePortRange => "MATCH_IP_SOURCE_PORT_RANGE",
            Self::MatchIpDestPortRange => "MATCH_IP_DEST_PORT_RANGE",
            Self::MatchCharacteristics => "MATCH_CHARACTERISTICS",
            Self::MatchFrameSizeRange => "MATCH_FRAME_SIZE_RANGE",
            Self::MatchTagsSameness => "MATCH_TAGS_SAMENESS",
            Self::MatchTagsBitwiseAnd => "MATCH_TAGS_BITWISE_AND",
            Self::MatchTagsBitwiseOr => "MATCH_TAGS_BITWISE_OR",
            Self::MatchTagsBitwiseXor => "MATCH_TAGS_BITWISE_XOR",
            Self::MatchRandom => "MATCH_RANDOM",
            Self::MatchIcmp => "MATCH_ICMP",
        }
    }

    /// Actions terminate or redirect evaluation, everything else is a match predicate.
    pub const fn is_action(&self) -> bool {
        matches!(
            self,
            Self::ActionDrop
                | Self::ActionAccept
                | Self::ActionBreak
                | Self::ActionTee
                | Self::ActionRedirect
                | Self::ActionDebugLog
        )
    }
}

impl FromStr for Kind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or(())
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
