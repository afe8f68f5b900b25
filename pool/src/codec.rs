use std::net::Ipv4Addr;

use ipnet::Ipv4Net;
use tracing::debug;

use crate::{
    err::{RangeError, Response},
    range::IpRange,
};

pub const HOST_PREFIX: u8 = 32;

/// Returned by [`smallest_cidr_string`] when no block contains the range.
/// Kept as text so it shows up in plan diffs instead of failing the run.
pub const UNKNOWN_CIDR: &str = "unable to figure out CIDR from range";

/// Parses `a.b.c.d/n`. Host bits are kept, see [`cidr_to_range`] for masking.
pub fn parse_cidr(cidr: &str) -> Response<Ipv4Net> {
    let malformed = || RangeError::MalformedCidr(cidr.to_owned());

    let (addr, prefix) = cidr.split_once('/').ok_or_else(malformed)?;

    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let addr: Ipv4Addr = addr.parse().map_err(|_| malformed())?;
    // All digits at this point, so the only parse failure left is overflow.
    let prefix: u32 = prefix.parse().unwrap_or(u32::MAX);
    let prefix = u8::try_from(prefix)
        .ok()
        .filter(|it| *it <= HOST_PREFIX)
        .ok_or(RangeError::PrefixOutOfRange(prefix))?;

    Ipv4Net::new(addr, prefix).map_err(|_| RangeError::PrefixOutOfRange(u32::from(prefix)))
}

/// The usable allocation range of a CIDR block.
///
/// The range runs from the network address to the broadcast address, except
/// that a network address ending in `.0` becomes `.1` and a broadcast address
/// ending in `.255` becomes `.254`. Only the last octet is looked at, so blocks
/// that don't end on those values (e.g. `10.0.0.128/25`) keep their network
/// address, and `/31`/`/32` blocks can come out with `first > last`.
#[tracing::instrument]
pub fn cidr_to_range(cidr: &str) -> Response<IpRange> {
    let net = parse_cidr(cidr)?;

    Ok(usable_range(&net))
}

pub fn usable_range(net: &Ipv4Net) -> IpRange {
    let mut first = net.network().octets();
    let mut last = net.broadcast().octets();

    if first[3] == 0 {
        debug!(%net, "reserving network address");
        first[3] = 1;
    }

    if last[3] == 255 {
        debug!(%net, "reserving broadcast address");
        last[3] = 254;
    }

    IpRange::new(first.into(), last.into())
}

/// The next address in big-endian order, or `None` past `255.255.255.255`.
pub fn next_address(addr: Ipv4Addr) -> Option<Ipv4Addr> {
    u32::from(addr).checked_add(1).map(Ipv4Addr::from)
}

/// The longest-prefix block starting at `from`'s network that also holds `to`.
pub fn smallest_cidr(from: Ipv4Addr, to: Ipv4Addr) -> Option<Ipv4Net> {
    (0..=HOST_PREFIX).rev().find_map(|len| {
        let net = Ipv4Net::new(from, len).ok()?.trunc();
        net.contains(&to).then_some(net)
    })
}

pub fn smallest_cidr_string(from: Ipv4Addr, to: Ipv4Addr) -> String {
    smallest_cidr(from, to).map_or_else(|| UNKNOWN_CIDR.to_owned(), |net| net.to_string())
}
