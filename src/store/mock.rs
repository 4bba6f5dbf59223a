//! In-memory [`ConfigStore`] for tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{ConfigStore, StoreError};

/// Store holding a fixed tree of nodes and values, recording value lookups.
#[derive(Debug, Default)]
pub struct MockStore {
    nodes: BTreeMap<String, Vec<String>>,
    values: BTreeMap<String, String>,
    failing: bool,
    value_queries: Mutex<Vec<String>>,
}

impl MockStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `peer` under `peer_path`, optionally tracking `interface`.
    pub fn with_peer(mut self, peer_path: &str, peer: &str, interface: Option<&str>) -> Self {
        self.nodes
            .entry(peer_path.to_string())
            .or_default()
            .push(peer.to_string());
        if let Some(interface) = interface {
            self.values.insert(
                format!("{peer_path} {peer} dhcp-interface"),
                interface.to_string(),
            );
        }
        self
    }

    /// Makes every query fail.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Returns the paths passed to `return_effective_value`, in order.
    pub fn value_queries(&self) -> Vec<String> {
        self.value_queries.lock().unwrap().clone()
    }

    fn check(&self, path: &str) -> Result<(), StoreError> {
        if self.failing {
            return Err(StoreError::Query {
                command: path.to_string(),
                reason: "store unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl ConfigStore for MockStore {
    async fn list_effective_nodes(&self, path: &str) -> Result<Vec<String>, StoreError> {
        self.check(path)?;
        Ok(self.nodes.get(path).cloned().unwrap_or_default())
    }

    async fn return_effective_value(&self, path: &str) -> Result<Option<String>, StoreError> {
        self.check(path)?;
        self.value_queries.lock().unwrap().push(path.to_string());
        Ok(self.values.get(path).cloned())
    }
}

impl ConfigStore for Arc<MockStore> {
    async fn list_effective_nodes(&self, path: &str) -> Result<Vec<String>, StoreError> {
        (**self).list_effective_nodes(path).await
    }

    async fn return_effective_value(&self, path: &str) -> Result<Option<String>, StoreError> {
        (**self).return_effective_value(path).await
    }
}
