//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use std::path::Path;

use ipsec_dhcp_hook::config::{ConfigError, field};
use ipsec_dhcp_hook::logging::{self, SyslogMakeWriter};
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Application exit codes.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success or nothing to do (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, unreadable config file, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 2) - file rewrite or daemon query failure.
    ///
    /// Note: This is a function rather than a constant because `ExitCode::from()` is not `const fn`.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Logs helpful hints for common configuration errors.
pub fn log_config_hint(error: &ConfigError) {
    if matches!(error, ConfigError::MissingRequired { field: f, .. } if *f == field::INTERFACE) {
        tracing::error!(
            "This program is run by the DHCP client's exit hook with --interface, \
             --new_ip, --old_ip and --reason."
        );
    }
}

/// Sets up the tracing subscriber for logging.
///
/// Events go to stderr and to the local syslog socket.
pub fn setup_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let syslog = SyslogMakeWriter::connect(Path::new(logging::DEFAULT_SOCKET), logging::IDENT);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(
            fmt::layer()
                .with_writer(syslog)
                .with_ansi(false)
                .without_time()
                .with_level(false)
                .with_target(false),
        )
        .init();
}
