use std::{fmt::Display, iter, net::Ipv4Addr};

use ipnet::Ipv4Net;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    codec::{cidr_to_range, next_address, smallest_cidr, smallest_cidr_string},
    err::{RangeError, Response},
};

/// An allocation pool as the network config stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpRange {
    #[serde(rename = "ipRangeStart")]
    pub first: Ipv4Addr,
    #[serde(rename = "ipRangeEnd")]
    pub last: Ipv4Addr,
}

impl IpRange {
    pub fn new(first: Ipv4Addr, last: Ipv4Addr) -> Self {
        Self { first, last }
    }

    pub fn from_bounds(first: &str, last: &str) -> Response<Self> {
        let parse = |addr: &str| {
            addr.trim()
                .parse::<Ipv4Addr>()
                .map_err(|_| RangeError::MalformedAddress(addr.to_owned()))
        };

        Ok(Self::new(parse(first)?, parse(last)?))
    }

    pub fn is_ordered(&self) -> bool {
        self.first <= self.last
    }

    pub fn contains(&self, addr: &Ipv4Addr) -> bool {
        self.first <= *addr && *addr <= self.last
    }

    /// Number of addresses in the range, zero when `first > last`.
    pub fn len(&self) -> u64 {
        if self.is_ordered() {
            u64::from(u32::from(self.last) - u32::from(self.first)) + 1
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_ordered()
    }

    /// Every address from `first` to `last`, inclusive.
    pub fn addresses(&self) -> impl Iterator<Item = Ipv4Addr> {
        let last = self.last;
        let start = self.is_ordered().then_some(self.first);

        iter::successors(start, move |addr| {
            if *addr < last {
                next_address(*addr)
            } else {
                None
            }
        })
    }

    pub fn smallest_cidr(&self) -> Option<Ipv4Net> {
        smallest_cidr(self.first, self.last)
    }
}

// `first-last`, the form pools are compared by.
impl Display for IpRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.first, self.last)
    }
}

/// A pool as the user writes it: a CIDR, explicit bounds, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<String>,
}

impl PoolSpec {
    pub fn from_cidr(cidr: &str) -> Self {
        Self {
            cidr: Some(cidr.to_owned()),
            ..Default::default()
        }
    }

    pub fn from_bounds(first: &str, last: &str) -> Self {
        Self {
            cidr: None,
            first: Some(first.to_owned()),
            last: Some(last.to_owned()),
        }
    }

    /// Rebuilds the form from a stored range, with the CIDR reconciled from its bounds.
    pub fn from_range(range: &IpRange) -> Self {
        Self {
            cidr: Some(smallest_cidr_string(range.first, range.last)),
            first: Some(range.first.to_string()),
            last: Some(range.last.to_string()),
        }
    }

    /// The CIDR wins when it parses. Otherwise the explicit bounds are used,
    /// and if those are missing or malformed too the CIDR's error is returned.
    #[tracing::instrument]
    pub fn resolve(&self) -> Response<IpRange> {
        let cidr = self.cidr.as_deref().filter(|it| !it.is_empty());

        let Some(cidr) = cidr else {
            return self.bounds();
        };

        match cidr_to_range(cidr) {
            Ok(range) => Ok(range),
            Err(e) => {
                warn!("{e}, falling back to explicit bounds");
                self.bounds().map_err(|_| e)
            }
        }
    }

    fn bounds(&self) -> Response<IpRange> {
        match (self.first.as_deref(), self.last.as_deref()) {
            (Some(first), Some(last)) => IpRange::from_bounds(first, last),
            _ => Err(RangeError::MissingBounds),
        }
    }
}
