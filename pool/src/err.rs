use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// Not `ipv4 "/" integer`.
    MalformedCidr(String),
    PrefixOutOfRange(u32),
    MalformedAddress(String),
    /// Neither a usable CIDR nor both explicit bounds were given.
    MissingBounds,
}

impl Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedCidr(cidr) => write!(f, "Malformed CIDR: {cidr:?}"),
            Self::PrefixOutOfRange(prefix) => {
                write!(f, "Prefix length {prefix} is outside of 0..=32")
            }
            Self::MalformedAddress(addr) => write!(f, "Malformed IPv4 address: {addr:?}"),
            Self::MissingBounds => write!(f, "Pool needs a CIDR or both first and last addresses"),
        }
    }
}

impl std::error::Error for RangeError {}

pub type Response<T> = Result<T, RangeError>;
