//! CLI argument models and startup configuration for the relay binary.
//!
//! Exposes the clap-backed [`Cli`] (every flag has an environment fallback)
//! and [`RelayConfig`], the immutable configuration validated once at startup
//! and handed to the dispatcher and the trigger filter.

pub mod cli_args;
pub mod relay_config;

pub use cli_args::{Cli, DEFAULT_ALLOWED_CHANNEL, DEFAULT_HEALTH_PORT};
pub use relay_config::{ConfigError, DeviceListingConfig, ListenConfig, RelayConfig};
