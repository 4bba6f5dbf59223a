//! Re-establishing tunnels after an address change.
//!
//! This module provides:
//! - The set of established, DHCP-tracked connections ([`ActiveConnectionSet`])
//! - Its computation from daemon and configuration store ([`ActiveConnectionResolver`])
//! - The terminate/reload/settle/re-initiate sequence ([`Reconciler`])

mod controller;
mod error;
mod resolver;
mod set;


pub use controller::{ReconcileReport, Reconciler};
pub use error::{ReconcileError, ResolveError, SnapshotStage};
pub use resolver::ActiveConnectionResolver;
pub use set::ActiveConnectionSet;
