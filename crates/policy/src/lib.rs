//! Hearth Policy Crate
//!
//! This crate holds the security contract the content bridge enforces on
//! externally generated markup: the sanitization allow-lists, the declarative
//! action-attribute vocabulary, and the typed message envelope used across
//! the isolation boundary.

pub mod allowlist;
pub mod error;
pub mod message;

pub use allowlist::{SanitizePolicy, ACTION_ATTRIBUTES, PLACEHOLDER_SELECTORS};
pub use error::{PolicyError, PolicyResult};
pub use message::{parse_message, BridgeMessage};
