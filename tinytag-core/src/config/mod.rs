//! Configuration types
//!
//! Tunables for the classifier, sampler, advertising timeout, reconnect
//! budget and sample cadence. The defaults ship as `tag.toml`, compiled in
//! and parsed at boot; a postcard blob form exists for provisioning.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
