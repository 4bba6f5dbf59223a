//! IPsec DHCP hook
//!
//! A library for keeping site-to-site IPsec tunnels pointed at an interface
//! whose address is assigned by DHCP: it rewrites the tunnels' local address
//! in `ipsec.conf` and `ipsec.secrets` and re-establishes them through the
//! strongSwan daemon.

pub mod config;
pub mod daemon;
pub mod event;
pub mod hook;
pub mod ipsec;
pub mod logging;
pub mod reconcile;
pub mod store;
pub mod time;
pub mod vici;
