use async_trait::async_trait;
use ipnet::IpNet;

use crate::config::WgConfig;
use crate::error::Result;

/// Handle to a network interface, resolved once per reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkHandle {
    pub name: String,
    pub index: u32,
}

impl LinkHandle {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Tunnel driver boundary: interface creation and cryptographic
/// peer configuration.
#[async_trait]
pub trait DeviceControl: Send + Sync {
    /// Look up an interface by name; Ok(None) when it does not exist.
    async fn lookup_interface(&self, name: &str) -> Result<Option<LinkHandle>>;

    /// Create a WireGuard-kind interface with the given name.
    async fn create_interface(&self, name: &str) -> Result<LinkHandle>;

    /// Mark the interface administratively up; idempotent.
    async fn set_up(&self, link: &LinkHandle) -> Result<()>;

    /// Mark the interface administratively down; idempotent.
    async fn set_down(&self, link: &LinkHandle) -> Result<()>;

    /// Install private key, listen port and the full peer set into the
    /// driver. This replaces the driver's peer state, it is not
    /// incremental.
    async fn push_config(&self, link: &LinkHandle, config: &WgConfig) -> Result<()>;
}

/// Kernel network boundary: address and route state of one interface.
#[async_trait]
pub trait NetworkManager: Send + Sync {
    /// Snapshot the interface's current addresses.
    async fn list_addresses(&self, link: &LinkHandle) -> Result<Vec<IpNet>>;

    /// Add an IP address to the interface.
    async fn add_address(&self, link: &LinkHandle, addr: IpNet) -> Result<()>;

    /// Remove an IP address from the interface.
    async fn del_address(&self, link: &LinkHandle, addr: IpNet) -> Result<()>;

    /// Snapshot the routes currently attached to the interface.
    async fn list_routes(&self, link: &LinkHandle) -> Result<Vec<IpNet>>;

    /// Add a route for `dest` through the interface.
    async fn add_route(&self, link: &LinkHandle, dest: IpNet) -> Result<()>;

    /// Remove the route for `dest` from the interface.
    async fn del_route(&self, link: &LinkHandle, dest: IpNet) -> Result<()>;

    /// Set the interface MTU.
    async fn set_mtu(&self, link: &LinkHandle, mtu: u32) -> Result<()>;
}
