//! Queries against the router's declared configuration.
//!
//! Tunnel definitions live in the configuration store, not in the IPsec
//! daemon. [`ConfigStore`] exposes the two read-only queries the hook needs,
//! both against the effective (committed) configuration.

mod error;
mod shell_api;

#[cfg(test)]
pub mod mock;

pub use error::StoreError;
pub use shell_api::ShellApiStore;

/// Read-only access to the effective configuration tree.
///
/// Paths are space-separated node names, e.g. `vpn ipsec site-to-site peer`.
pub trait ConfigStore: Send + Sync {
    /// Lists the child node names under `path`.
    ///
    /// A path that does not exist has no children.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    fn list_effective_nodes(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Vec<String>, StoreError>> + Send;

    /// Returns the value at `path`, or `None` if it is not set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be queried.
    fn return_effective_value(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>> + Send;
}
