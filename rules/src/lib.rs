//! Typed model and decoder for ZeroTier flow rules.
//!
//! The rule compiler emits a list of loosely typed records, each tagged with a
//! `type` discriminator. [`decode_one`] resolves one record into the closed
//! [`RuleBody`] sum, [`decode_many`] does it for a whole list and fails on the
//! first bad record. Decoded rules serialize back to the same tagged shape.

pub mod config;
pub mod decode;
pub mod err;
pub mod kind;
pub mod model;


pub use config::{Capability, CompilerOutput, RuleSet, Tag, TagByName};
pub use decode::{decode_many, decode_one};
pub use err::{DecodeError, Response};
pub use kind::Kind;
pub use model::{CharacteristicsMask, EtherType, MacAddress, NodeAddress, Rule, RuleBody};
