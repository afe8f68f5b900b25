//! IPv4 allocation pool codec: CIDR blocks to usable `ipRangeStart`/`ipRangeEnd`
//! bounds and back.

pub mod codec;
pub mod err;
pub mod range;

#[cfg(test)]
mod tests;

pub use codec::{
    cidr_to_range, next_address, parse_cidr, smallest_cidr, smallest_cidr_string, usable_range,
    UNKNOWN_CIDR,
};
pub use err::{RangeError, Response};
pub use range::{IpRange, PoolSpec};
