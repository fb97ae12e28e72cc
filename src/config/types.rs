use ipnet::IpNet;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::ConfigError;

/// Complete desired state for one WireGuard interface
#[derive(Clone)]
pub struct WgConfig {
    pub interface: InterfaceConfig,
    pub peers: Vec<PeerConfig>,
}

impl fmt::Debug for WgConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgConfig")
            .field("interface", &self.interface)
            .field("peers", &self.peers)
            .finish()
    }
}

/// Routing table selection for routes derived from AllowedIPs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteTable {
    /// Routes go to the default table (the default)
    #[default]
    Auto,
    /// Route creation is disabled entirely
    Off,
    /// Explicit numeric table id
    Id(u32),
}

impl fmt::Display for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteTable::Auto => write!(f, "auto"),
            RouteTable::Off => write!(f, "off"),
            RouteTable::Id(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for RouteTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auto" => Ok(RouteTable::Auto),
            "off" => Ok(RouteTable::Off),
            other => other
                .parse::<u32>()
                .map(RouteTable::Id)
                .map_err(|_| ConfigError::InvalidTable(s.to_string())),
        }
    }
}

/// [Interface] section configuration
#[derive(Clone)]
pub struct InterfaceConfig {
    /// Private key for this interface
    pub private_key: StaticSecret,
    /// IP addresses to assign to the interface, in declaration order.
    /// Host bits are meaningful here (e.g. 10.0.0.2/24).
    pub addresses: Vec<IpNet>,
    /// UDP listen port (None = driver-selected)
    pub listen_port: Option<u16>,
    /// DNS servers (carried and rendered, not applied to the resolver)
    pub dns: Vec<IpAddr>,
    /// MTU setting (None = kernel default)
    pub mtu: Option<u32>,
    /// Routing table for AllowedIPs-derived routes
    pub table: RouteTable,
    /// Command run before the interface comes up (`%i` expands to its name)
    pub pre_up: Option<String>,
    /// Command run after the interface comes up
    pub post_up: Option<String>,
    /// Command run before the interface goes down
    pub pre_down: Option<String>,
    /// Command run after the interface goes down
    pub post_down: Option<String>,
    /// Save interface state back to the config file on shutdown
    pub save_config: bool,
}

impl fmt::Debug for InterfaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceConfig")
            .field("addresses", &self.addresses)
            .field("listen_port", &self.listen_port)
            .field("dns", &self.dns)
            .field("mtu", &self.mtu)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl InterfaceConfig {
    pub fn new(private_key: StaticSecret) -> Self {
        Self {
            private_key,
            addresses: Vec::new(),
            listen_port: None,
            dns: Vec::new(),
            mtu: None,
            table: RouteTable::default(),
            pre_up: None,
            post_up: None,
            pre_down: None,
            post_down: None,
            save_config: false,
        }
    }
}

/// [Peer] section configuration
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Public key of this peer
    pub public_key: PublicKey,
    /// IP ranges routed through this peer, in declaration order
    pub allowed_ips: Vec<IpNet>,
    /// Remote endpoint
    pub endpoint: Option<SocketAddr>,
}

impl PeerConfig {
    pub fn new(public_key: PublicKey) -> Self {
        Self {
            public_key,
            allowed_ips: Vec::new(),
            endpoint: None,
        }
    }
}
