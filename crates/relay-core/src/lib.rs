//! Foundational low-level utilities shared across relay crates.
//!
//! Provides the millisecond clock used by request signing and the small text
//! helpers used when normalizing configuration and rendering error details.

pub mod text_utils;
pub mod time_utils;

pub use text_utils::{non_empty_trimmed, truncate_for_error};
pub use time_utils::current_unix_timestamp_ms;
