//! CLI argument parsing using clap.
//!
//! The DHCP client's exit hook invokes the binary with the lease details;
//! the option spellings (`--new_ip`, `--old_ip`) are fixed by that caller.

use std::path::PathBuf;

use clap::Parser;

/// IPsec DHCP hook
///
/// Points site-to-site IPsec tunnels at an interface's new DHCP address
/// and re-establishes them.
#[derive(Debug, Parser)]
#[command(name = "ipsec-dhclient-hook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Interface whose lease changed
    #[arg(long)]
    pub interface: Option<String>,

    /// New address (empty if the interface lost its address)
    #[arg(long = "new_ip", value_name = "ADDR")]
    pub new_ip: Option<String>,

    /// Previous address
    #[arg(long = "old_ip", value_name = "ADDR")]
    pub old_ip: Option<String>,

    /// DHCP client reason (BOUND, RENEW, REBOOT, EXPIRE, ...)
    #[arg(long)]
    pub reason: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Path to ipsec.conf
    #[arg(long = "ipsec-conf", value_name = "PATH")]
    pub ipsec_conf: Option<PathBuf>,

    /// Path to ipsec.secrets
    #[arg(long = "ipsec-secrets", value_name = "PATH")]
    pub ipsec_secrets: Option<PathBuf>,

    /// Path to the charon VICI socket
    #[arg(long = "vici-socket", value_name = "PATH")]
    pub vici_socket: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
