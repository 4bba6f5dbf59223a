//! DHCP lease events and the significance filter.
//!
//! The DHCP client calls the hook for every lease transition. Most of them
//! (renewals that keep the address, reboots, expiry) need no IPsec work;
//! [`DhcpEvent::requires_update`] decides which ones do.

use std::fmt;
use std::net::IpAddr;

/// Reason token passed by the DHCP client.
///
/// Only three tokens get special handling; everything else is a generic
/// address change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// A new lease was bound.
    Bound,
    /// The client is re-validating a lease after reboot.
    Reboot,
    /// The lease expired.
    Expire,
    /// Any other reason (`RENEW`, `REBIND`, `RELEASE`, ...).
    Other(String),
}

impl Reason {
    /// Parses a reason token. Matching is exact-case.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token {
            "BOUND" => Self::Bound,
            "REBOOT" => Self::Reboot,
            "EXPIRE" => Self::Expire,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the reason as the token the DHCP client passed.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bound => "BOUND",
            Self::Reboot => "REBOOT",
            Self::Expire => "EXPIRE",
            Self::Other(token) => token,
        }
    }

    /// Returns `true` for transitions that never touch the IPsec configuration.
    #[must_use]
    pub const fn always_skipped(&self) -> bool {
        matches!(self, Self::Reboot | Self::Expire)
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invocation of the hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpEvent {
    /// Interface whose lease changed.
    pub interface: String,
    /// Address before the event, if any.
    pub old_address: Option<IpAddr>,
    /// Address after the event; `None` means the interface lost its address.
    pub new_address: Option<IpAddr>,
    /// Why the DHCP client invoked the hook.
    pub reason: Reason,
}

impl DhcpEvent {
    /// Creates a new event.
    #[must_use]
    pub fn new(
        interface: impl Into<String>,
        old_address: Option<IpAddr>,
        new_address: Option<IpAddr>,
        reason: Reason,
    ) -> Self {
        Self {
            interface: interface.into(),
            old_address,
            new_address,
            reason,
        }
    }

    /// Returns `true` if the event must be propagated to the IPsec configuration.
    ///
    /// Skips unchanged addresses (unless the lease was freshly bound), as well
    /// as `REBOOT` and `EXPIRE` transitions.
    #[must_use]
    pub fn requires_update(&self) -> bool {
        let unchanged = self.old_address == self.new_address && self.reason != Reason::Bound;
        !(unchanged || self.reason.always_skipped())
    }

    /// Returns the new address rendered for the config files, if any.
    #[must_use]
    pub fn new_address_text(&self) -> Option<String> {
        self.new_address.map(|addr| addr.to_string())
    }
}

impl fmt::Display for DhcpEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interface {}: {} -> {} (reason: {})",
            self.interface,
            display_address(self.old_address),
            display_address(self.new_address),
            self.reason
        )
    }
}

fn display_address(address: Option<IpAddr>) -> String {
    address.map_or_else(|| "none".to_string(), |a| a.to_string())
}
