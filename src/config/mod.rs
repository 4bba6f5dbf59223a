//! Configuration layer for the hook.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The event itself (`--interface`, `--new_ip`, `--old_ip`, `--reason`) is
//! CLI-only: the DHCP client passes it on every invocation. The config file
//! only relocates the files, sockets and helpers the hook talks to, and
//! tunes its timing.
//!
//! # Address Arguments
//!
//! The DHCP client passes an empty string when an address is unknown, so an
//! empty `--new_ip` or `--old_ip` is the same as omitting it. Any other value
//! must be an IP address.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;


pub use cli::Cli;
pub use error::{ConfigError, field};
pub use toml::TomlConfig;
pub use validated::ValidatedConfig;
