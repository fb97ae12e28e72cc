//! Route reconciliation.
//!
//! AllowedIPs are the routing source of truth: the interface must carry
//! exactly the routes implied by the current peer set, so configuration
//! changes converge automatically on the next pass.

use ipnet::IpNet;

use crate::config::PeerConfig;
use crate::error::{Result, RouteError};
use crate::events::{EventSink, SyncEvent};
use crate::platform::traits::{LinkHandle, NetworkManager};
use crate::sync::diff::DiffSet;

/// Converge the interface's routes to the union of all peers' AllowedIPs.
///
/// Every peer's allowed prefixes are flattened into one desired set keyed
/// by destination CIDR; duplicates across peers collapse. Observed routes
/// no peer declares, including manually added ones, are removed.
pub async fn sync_routes(
    net: &dyn NetworkManager,
    link: &LinkHandle,
    peers: &[PeerConfig],
    events: &dyn EventSink,
) -> Result<()> {
    let observed = net.list_routes(link).await?;
    let mut set = DiffSet::observe(observed.iter().map(|dest| dest.to_string()));

    for peer in peers {
        for allowed in &peer.allowed_ips {
            let dest = allowed.trunc();
            let key = dest.to_string();
            if set.keep(&key) {
                events.emit(SyncEvent::RouteKept {
                    iface: link.name.clone(),
                    dest: key,
                });
                continue;
            }

            net.add_route(link, dest).await?;
            events.emit(SyncEvent::RouteAdded {
                iface: link.name.clone(),
                dest: key,
            });
        }
    }

    let stale: Vec<String> = set.extraneous().map(str::to_string).collect();
    for entry in stale {
        let dest: IpNet = entry.parse().map_err(|_| RouteError::Observed {
            iface: link.name.clone(),
            entry: entry.clone(),
        })?;

        events.emit(SyncEvent::ForeignRoute {
            iface: link.name.clone(),
            dest: entry.clone(),
        });

        net.del_route(link, dest).await?;
        events.emit(SyncEvent::RouteRemoved {
            iface: link.name.clone(),
            dest: entry,
        });
    }

    Ok(())
}
