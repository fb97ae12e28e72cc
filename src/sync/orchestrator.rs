//! Reconciliation pass orchestration.

use crate::config::{RouteTable, WgConfig};
use crate::error::{LinkError, Result};
use crate::events::{EventSink, HookStage, SyncEvent};
use crate::hooks::{expand_interface, HookRunner};
use crate::platform::traits::{DeviceControl, NetworkManager};
use crate::sync::addresses::sync_addresses;
use crate::sync::link::ensure_up;
use crate::sync::routes::sync_routes;

/// Sequences one reconciliation pass over a single interface.
///
/// Phases run strictly in order: hooks and link lifecycle, device
/// configuration, address sync, route sync. The first failure aborts the
/// remaining phases and is propagated unchanged; the interface may be left
/// partially configured, and re-running the pass is the recovery path.
/// Concurrent passes over the same interface race on address and route
/// mutation and must be serialized by the caller.
pub struct Reconciler<'a> {
    dev: &'a dyn DeviceControl,
    net: &'a dyn NetworkManager,
    hooks: &'a dyn HookRunner,
    events: &'a dyn EventSink,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        dev: &'a dyn DeviceControl,
        net: &'a dyn NetworkManager,
        hooks: &'a dyn HookRunner,
        events: &'a dyn EventSink,
    ) -> Self {
        Self {
            dev,
            net,
            hooks,
            events,
        }
    }

    /// Bring the interface up and converge it to the desired configuration.
    pub async fn up(&self, name: &str, config: &WgConfig) -> Result<()> {
        self.run_hook(HookStage::PreUp, config.interface.pre_up.as_deref(), name)
            .await?;

        let link = ensure_up(self.dev, name, self.events).await?;

        if let Some(mtu) = config.interface.mtu {
            self.net.set_mtu(&link, mtu).await?;
        }

        self.dev.push_config(&link, config).await?;
        self.events.emit(SyncEvent::DeviceConfigured {
            iface: link.name.clone(),
            peers: config.peers.len(),
        });

        sync_addresses(self.net, &link, &config.interface.addresses, self.events).await?;

        if config.interface.table == RouteTable::Off {
            tracing::debug!(iface = %name, "route sync disabled by Table = off");
        } else {
            sync_routes(self.net, &link, &config.peers, self.events).await?;
        }

        self.run_hook(HookStage::PostUp, config.interface.post_up.as_deref(), name)
            .await?;

        tracing::info!(iface = %name, "interface reconciled");
        Ok(())
    }

    /// Take the interface administratively down.
    pub async fn down(&self, name: &str, config: &WgConfig) -> Result<()> {
        self.run_hook(
            HookStage::PreDown,
            config.interface.pre_down.as_deref(),
            name,
        )
        .await?;

        let link = self
            .dev
            .lookup_interface(name)
            .await?
            .ok_or_else(|| LinkError::NotFound(name.to_string()))?;
        self.dev.set_down(&link).await?;
        self.events.emit(SyncEvent::LinkDown {
            iface: name.to_string(),
        });

        self.run_hook(
            HookStage::PostDown,
            config.interface.post_down.as_deref(),
            name,
        )
        .await?;

        Ok(())
    }

    async fn run_hook(&self, stage: HookStage, command: Option<&str>, iface: &str) -> Result<()> {
        let Some(command) = command else {
            return Ok(());
        };

        let command = expand_interface(command, iface);
        self.hooks.run(&command).await?;
        self.events.emit(SyncEvent::HookRan { stage, command });
        Ok(())
    }
}
