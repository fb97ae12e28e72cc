//! Address reconciliation.

use ipnet::IpNet;

use crate::error::{AddressError, Result};
use crate::events::{EventSink, SyncEvent};
use crate::platform::traits::{LinkHandle, NetworkManager};
use crate::sync::diff::DiffSet;

/// Converge the interface's addresses to exactly the desired set.
///
/// Missing addresses are added; observed addresses no desired entry claims
/// are deleted. Addresses are diffed by their canonical `ip/prefix` text,
/// so a desired duplicate collapses to a single kept entry.
pub async fn sync_addresses(
    net: &dyn NetworkManager,
    link: &LinkHandle,
    desired: &[IpNet],
    events: &dyn EventSink,
) -> Result<()> {
    let observed = net.list_addresses(link).await?;
    let mut set = DiffSet::observe(observed.iter().map(|addr| addr.to_string()));

    for addr in desired {
        let key = addr.to_string();
        if set.keep(&key) {
            events.emit(SyncEvent::AddressKept {
                iface: link.name.clone(),
                addr: key,
            });
            continue;
        }

        net.add_address(link, *addr).await?;
        events.emit(SyncEvent::AddressAdded {
            iface: link.name.clone(),
            addr: key,
        });
    }

    let stale: Vec<String> = set.extraneous().map(str::to_string).collect();
    for entry in stale {
        let addr: IpNet = entry.parse().map_err(|_| AddressError::Observed {
            iface: link.name.clone(),
            entry: entry.clone(),
        })?;

        net.del_address(link, addr).await?;
        events.emit(SyncEvent::AddressRemoved {
            iface: link.name.clone(),
            addr: entry,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::{MockNet, NetCall, RecordingSink};

    fn nets(specs: &[&str]) -> Vec<IpNet> {
        specs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[tokio::test]
    async fn test_add_missing_address() {
        // Scenario A: desired [10.0.0.2/24], observed [] -> one add, no deletes.
        let net = MockNet::new();
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();

        sync_addresses(&net, &link, &nets(&["10.0.0.2/24"]), &events)
            .await
            .unwrap();

        assert_eq!(
            net.calls(),
            vec![
                NetCall::ListAddresses,
                NetCall::AddAddress("10.0.0.2/24".to_string()),
            ]
        );
        assert_eq!(net.addresses(), nets(&["10.0.0.2/24"]));
    }

    #[tokio::test]
    async fn test_remove_extraneous_address() {
        // Scenario B: one delete for 192.168.1.1/24, zero adds.
        let net = MockNet::new().with_addresses(&["10.0.0.2/24", "192.168.1.1/24"]);
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();

        sync_addresses(&net, &link, &nets(&["10.0.0.2/24"]), &events)
            .await
            .unwrap();

        assert_eq!(
            net.calls(),
            vec![
                NetCall::ListAddresses,
                NetCall::DelAddress("192.168.1.1/24".to_string()),
            ]
        );
        assert_eq!(net.addresses(), nets(&["10.0.0.2/24"]));
    }

    #[tokio::test]
    async fn test_converges_to_exactly_desired_set() {
        let net = MockNet::new().with_addresses(&["192.168.1.1/24", "fd00::1/64"]);
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();
        let desired = nets(&["10.0.0.2/24", "fd00::1/64"]);

        sync_addresses(&net, &link, &desired, &events).await.unwrap();

        let mut observed = net.addresses();
        observed.sort();
        let mut expected = desired.clone();
        expected.sort();
        assert_eq!(observed, expected);
    }

    #[tokio::test]
    async fn test_second_pass_is_idempotent() {
        let net = MockNet::new().with_addresses(&["192.168.1.1/24"]);
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();
        let desired = nets(&["10.0.0.2/24"]);

        sync_addresses(&net, &link, &desired, &events).await.unwrap();
        net.clear_calls();

        sync_addresses(&net, &link, &desired, &events).await.unwrap();
        assert_eq!(net.calls(), vec![NetCall::ListAddresses]);
    }

    #[tokio::test]
    async fn test_duplicate_desired_address_added_once() {
        let net = MockNet::new();
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();

        sync_addresses(&net, &link, &nets(&["10.0.0.2/24", "10.0.0.2/24"]), &events)
            .await
            .unwrap();

        let adds = net
            .calls()
            .iter()
            .filter(|c| matches!(c, NetCall::AddAddress(_)))
            .count();
        assert_eq!(adds, 1);
    }

    #[tokio::test]
    async fn test_add_failure_aborts_pass() {
        let net = MockNet::new().fail_add_address();
        let link = LinkHandle::new("wg0", 1);
        let events = RecordingSink::new();

        let err = sync_addresses(&net, &link, &nets(&["10.0.0.2/24"]), &events)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::WgError::Address(_)));
    }
}
