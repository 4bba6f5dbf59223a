//! Computing the set of established, DHCP-tracked connections.

use std::collections::HashMap;

use super::{ActiveConnectionSet, ResolveError};
use crate::daemon::IpsecDaemon;
use crate::store::ConfigStore;

/// Joins the daemon's live SAs with the declared peers.
///
/// A live SA belongs to a peer when its name contains the peer's name as a
/// substring (SA names embed the peer address, e.g.
/// `peer-192.0.2.1-tunnel-1`). It is active for the hook only if that peer
/// has a non-empty `dhcp-interface` value.
#[derive(Debug, Clone)]
pub struct ActiveConnectionResolver<D, C> {
    daemon: D,
    store: C,
    peer_path: String,
}

impl<D: IpsecDaemon, C: ConfigStore> ActiveConnectionResolver<D, C> {
    /// Creates a resolver reading peers from `peer_path` in the store.
    pub fn new(daemon: D, store: C, peer_path: impl Into<String>) -> Self {
        Self {
            daemon,
            store,
            peer_path: peer_path.into(),
        }
    }

    /// Returns the daemon handle.
    pub const fn daemon(&self) -> &D {
        &self.daemon
    }

    /// Lists the active connections.
    ///
    /// Each matching peer's `dhcp-interface` value is looked up at most once.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] if either the store or the daemon fails.
    pub async fn list(&self) -> Result<ActiveConnectionSet, ResolveError> {
        let peers = self.store.list_effective_nodes(&self.peer_path).await?;
        let sas = self.daemon.list_sas().await?;
        tracing::debug!("Declared peers: {peers:?}; live SAs: {sas:?}");

        let mut tracked: HashMap<&str, bool> = HashMap::new();
        let mut active = ActiveConnectionSet::new();

        for sa in &sas {
            for peer in peers.iter().filter(|peer| sa.contains(peer.as_str())) {
                let is_tracked = match tracked.get(peer.as_str()) {
                    Some(&known) => known,
                    None => {
                        let known = self.tracks_interface(peer).await?;
                        tracked.insert(peer.as_str(), known);
                        known
                    }
                };
                if is_tracked {
                    active.insert(sa.as_str());
                    break;
                }
            }
        }

        Ok(active)
    }

    async fn tracks_interface(&self, peer: &str) -> Result<bool, ResolveError> {
        let path = format!("{} {peer} dhcp-interface", self.peer_path);
        let value = self.store.return_effective_value(&path).await?;
        Ok(value.is_some_and(|interface| !interface.is_empty()))
    }
}
