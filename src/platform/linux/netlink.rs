//! Kernel address and route state via rtnetlink.

use async_trait::async_trait;
use futures::TryStreamExt;
use ipnet::IpNet;
use netlink_packet_route::{
    nlas::address::Nla as AddressNla, nlas::route::Nla as RouteNla, AddressMessage, RouteMessage,
    AF_INET, AF_INET6, RT_TABLE_MAIN,
};
use rtnetlink::{Handle, IpVersion};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::{AddressError, LinkError, Result, RouteError};
use crate::platform::traits::{LinkHandle, NetworkManager};

/// Linux implementation of [`NetworkManager`] using netlink
pub struct LinuxNetworkManager {
    handle: Handle,
}

impl LinuxNetworkManager {
    pub async fn new() -> Result<Self> {
        let (connection, handle, _) =
            rtnetlink::new_connection().map_err(|e| LinkError::Netlink(e.to_string()))?;

        // Spawn the connection handler
        tokio::spawn(connection);

        Ok(Self { handle })
    }

    async fn address_messages(&self, link: &LinkHandle) -> Result<Vec<AddressMessage>> {
        let mut stream = self
            .handle
            .address()
            .get()
            .set_link_index_filter(link.index)
            .execute();

        let mut messages = Vec::new();
        while let Some(msg) = stream.try_next().await.map_err(|e| AddressError::List {
            iface: link.name.clone(),
            reason: e.to_string(),
        })? {
            messages.push(msg);
        }
        Ok(messages)
    }

    async fn route_messages(&self, link: &LinkHandle) -> Result<Vec<RouteMessage>> {
        let mut messages = Vec::new();
        for version in [IpVersion::V4, IpVersion::V6] {
            let mut stream = self.handle.route().get(version).execute();
            while let Some(msg) = stream.try_next().await.map_err(|e| RouteError::List {
                iface: link.name.clone(),
                reason: e.to_string(),
            })? {
                if route_destination(&msg, link.index).is_some() {
                    messages.push(msg);
                }
            }
        }
        Ok(messages)
    }
}

#[async_trait]
impl NetworkManager for LinuxNetworkManager {
    async fn list_addresses(&self, link: &LinkHandle) -> Result<Vec<IpNet>> {
        let addrs = self
            .address_messages(link)
            .await?
            .iter()
            .filter_map(interface_address)
            .collect();
        Ok(addrs)
    }

    async fn add_address(&self, link: &LinkHandle, addr: IpNet) -> Result<()> {
        self.handle
            .address()
            .add(link.index, addr.addr(), addr.prefix_len())
            .execute()
            .await
            .map_err(|e| AddressError::Add {
                iface: link.name.clone(),
                addr: addr.to_string(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn del_address(&self, link: &LinkHandle, addr: IpNet) -> Result<()> {
        for msg in self.address_messages(link).await? {
            if interface_address(&msg) == Some(addr) {
                self.handle
                    .address()
                    .del(msg)
                    .execute()
                    .await
                    .map_err(|e| AddressError::Del {
                        iface: link.name.clone(),
                        addr: addr.to_string(),
                        reason: e.to_string(),
                    })?;
                return Ok(());
            }
        }

        // Already gone; nothing to delete.
        tracing::debug!(iface = %link.name, %addr, "address not present, skipping delete");
        Ok(())
    }

    async fn list_routes(&self, link: &LinkHandle) -> Result<Vec<IpNet>> {
        let routes = self
            .route_messages(link)
            .await?
            .iter()
            .filter_map(|msg| route_destination(msg, link.index))
            .collect();
        Ok(routes)
    }

    async fn add_route(&self, link: &LinkHandle, dest: IpNet) -> Result<()> {
        let result = match dest {
            IpNet::V4(net) => {
                self.handle
                    .route()
                    .add()
                    .v4()
                    .destination_prefix(net.network(), net.prefix_len())
                    .output_interface(link.index)
                    .execute()
                    .await
            }
            IpNet::V6(net) => {
                self.handle
                    .route()
                    .add()
                    .v6()
                    .destination_prefix(net.network(), net.prefix_len())
                    .output_interface(link.index)
                    .execute()
                    .await
            }
        };

        result.map_err(|e| RouteError::Add {
            iface: link.name.clone(),
            dest: dest.to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    async fn del_route(&self, link: &LinkHandle, dest: IpNet) -> Result<()> {
        for msg in self.route_messages(link).await? {
            if route_destination(&msg, link.index) == Some(dest) {
                self.handle
                    .route()
                    .del(msg)
                    .execute()
                    .await
                    .map_err(|e| RouteError::Del {
                        iface: link.name.clone(),
                        dest: dest.to_string(),
                        reason: e.to_string(),
                    })?;
                return Ok(());
            }
        }

        tracing::debug!(iface = %link.name, %dest, "route not present, skipping delete");
        Ok(())
    }

    async fn set_mtu(&self, link: &LinkHandle, mtu: u32) -> Result<()> {
        self.handle
            .link()
            .set(link.index)
            .mtu(mtu)
            .execute()
            .await
            .map_err(|e| LinkError::Netlink(e.to_string()))?;

        Ok(())
    }
}

/// Extract the interface address carried by an RTM_NEWADDR message.
///
/// IFA_LOCAL holds the interface's own address; IFA_ADDRESS is the peer
/// on point-to-point links and mirrors IFA_LOCAL otherwise.
fn interface_address(msg: &AddressMessage) -> Option<IpNet> {
    let mut address = None;
    let mut local = None;
    for nla in &msg.nlas {
        match nla {
            AddressNla::Local(bytes) => local = ip_from_bytes(bytes),
            AddressNla::Address(bytes) => address = ip_from_bytes(bytes),
            _ => {}
        }
    }

    let ip = local.or(address)?;
    IpNet::new(ip, msg.header.prefix_len).ok()
}

/// Destination of a main-table route attached to the given interface.
fn route_destination(msg: &RouteMessage, index: u32) -> Option<IpNet> {
    if msg.header.table != RT_TABLE_MAIN {
        return None;
    }

    let mut oif = None;
    let mut dest = None;
    for nla in &msg.nlas {
        match nla {
            RouteNla::Oif(i) => oif = Some(*i),
            RouteNla::Destination(bytes) => dest = ip_from_bytes(bytes),
            _ => {}
        }
    }

    if oif != Some(index) {
        return None;
    }

    // A route with no RTA_DST is a default route.
    let ip = dest.or_else(|| match u16::from(msg.header.address_family) {
        AF_INET => Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
        AF_INET6 => Some(IpAddr::V6(Ipv6Addr::UNSPECIFIED)),
        _ => None,
    })?;

    IpNet::new(ip, msg.header.destination_prefix_length).ok()
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().ok()?;
            Some(IpAddr::from(octets))
        }
        _ => None,
    }
}
