//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default location of the connection definitions.
pub const IPSEC_CONF: &str = "/etc/ipsec.conf";

/// Default location of the pre-shared keys.
pub const IPSEC_SECRETS: &str = "/etc/ipsec.secrets";

/// Default charon control socket.
pub const VICI_SOCKET: &str = "/var/run/charon.vici";

/// Default `ipsec` control script, used to reload the daemon.
pub const IPSEC_COMMAND: &str = "/usr/sbin/ipsec";

/// Default configuration store query helper.
pub const SHELL_API: &str = "/bin/cli-shell-api";

/// Configuration path under which site-to-site peers are declared.
pub const PEER_PATH: &str = "vpn ipsec site-to-site peer";

/// Default wait after reloading before checking which tunnels came back.
pub const SETTLE_SECS: u64 = 5;

/// Default timeout for initiating a tunnel.
pub const INITIATE_TIMEOUT_SECS: u64 = 10;

/// Default settle window as Duration.
#[must_use]
pub const fn settle() -> Duration {
    Duration::from_secs(SETTLE_SECS)
}

/// Default initiate timeout as Duration.
#[must_use]
pub const fn initiate_timeout() -> Duration {
    Duration::from_secs(INITIATE_TIMEOUT_SECS)
}
