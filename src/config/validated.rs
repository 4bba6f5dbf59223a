//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::event::{DhcpEvent, Reason};
use crate::ipsec::IpsecFiles;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The lease change being handled
    pub event: DhcpEvent,

    /// Files to rewrite
    pub files: IpsecFiles,

    /// Charon VICI socket
    pub vici_socket: PathBuf,

    /// `ipsec` control script
    pub ipsec_command: PathBuf,

    /// Wait between reload and the second snapshot
    pub settle: Duration,

    /// Timeout for each tunnel initiation
    pub initiate_timeout: Duration,

    /// Configuration store query helper
    pub shell_api: PathBuf,

    /// Configuration path of the site-to-site peers
    pub peer_path: String,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ conf: {}, secrets: {}, vici_socket: {}, settle: {}s, initiate_timeout: {}s }}",
            self.files.conf.display(),
            self.files.secrets.display(),
            self.vici_socket.display(),
            self.settle.as_secs(),
            self.initiate_timeout.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `--interface` is missing or empty
    /// - `--new_ip` or `--old_ip` is neither empty nor an IP address, unless
    ///   the event is skipped anyway (`REBOOT`, `EXPIRE`, unchanged address)
    /// - A duration value is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let event = Self::resolve_event(cli)?;

        let files = IpsecFiles::new(
            cli.ipsec_conf
                .clone()
                .or_else(|| toml.and_then(|t| t.files.conf.clone()))
                .unwrap_or_else(|| PathBuf::from(defaults::IPSEC_CONF)),
            cli.ipsec_secrets
                .clone()
                .or_else(|| toml.and_then(|t| t.files.secrets.clone()))
                .unwrap_or_else(|| PathBuf::from(defaults::IPSEC_SECRETS)),
        );

        let vici_socket = cli
            .vici_socket
            .clone()
            .or_else(|| toml.and_then(|t| t.daemon.vici_socket.clone()))
            .unwrap_or_else(|| PathBuf::from(defaults::VICI_SOCKET));

        let ipsec_command = toml
            .and_then(|t| t.daemon.ipsec_command.clone())
            .unwrap_or_else(|| PathBuf::from(defaults::IPSEC_COMMAND));

        let settle = resolve_duration(
            field::SETTLE_SECS,
            toml.and_then(|t| t.daemon.settle_secs),
            defaults::settle(),
        )?;

        let initiate_timeout = resolve_duration(
            field::INITIATE_TIMEOUT_SECS,
            toml.and_then(|t| t.daemon.initiate_timeout_secs),
            defaults::initiate_timeout(),
        )?;

        let shell_api = toml
            .and_then(|t| t.store.shell_api.clone())
            .unwrap_or_else(|| PathBuf::from(defaults::SHELL_API));

        let peer_path = toml
            .and_then(|t| t.store.peer_path.clone())
            .unwrap_or_else(|| defaults::PEER_PATH.to_string());

        Ok(Self {
            event,
            files,
            vici_socket,
            ipsec_command,
            settle,
            initiate_timeout,
            shell_api,
            peer_path,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_event(cli: &Cli) -> Result<DhcpEvent, ConfigError> {
        let interface = cli
            .interface
            .as_deref()
            .filter(|i| !i.is_empty())
            .ok_or_else(|| {
                ConfigError::missing(field::INTERFACE, "The DHCP client must pass --interface")
            })?;

        let reason = Reason::parse(cli.reason.as_deref().unwrap_or_default());

        // Skipped events exit 0 whatever the DHCP client passed as addresses
        let lenient = reason.always_skipped()
            || (reason != Reason::Bound
                && address_text(cli.new_ip.as_deref()) == address_text(cli.old_ip.as_deref()));

        let new_address = resolve_address(field::NEW_IP, cli.new_ip.as_deref(), lenient)?;
        let old_address = resolve_address(field::OLD_IP, cli.old_ip.as_deref(), lenient)?;

        Ok(DhcpEvent::new(interface, old_address, new_address, reason))
    }
}

// Helper functions

/// Trimmed address argument; empty counts as absent.
fn address_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses an address argument, downgrading a bad value to "no address" when `lenient`.
fn resolve_address(
    field: &'static str,
    value: Option<&str>,
    lenient: bool,
) -> Result<Option<IpAddr>, ConfigError> {
    match parse_address(field, value) {
        Err(e) if lenient => {
            tracing::warn!("Ignoring {e} for a skipped event");
            Ok(None)
        }
        result => result,
    }
}

/// Parses an optional address; an empty value means "no address".
fn parse_address(field: &'static str, value: Option<&str>) -> Result<Option<IpAddr>, ConfigError> {
    let Some(value) = address_text(value) else {
        return Ok(None);
    };

    value
        .parse()
        .map(Some)
        .map_err(|source| ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
            source,
        })
}

fn resolve_duration(
    field: &'static str,
    secs: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match secs {
        None => Ok(default),
        Some(0) => Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than zero".to_string(),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
    }
}
