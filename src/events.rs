//! Structured reconciliation events.
//!
//! Every observable action taken during a reconciliation pass is reported
//! through an [`EventSink`] passed explicitly into the components, so the
//! core carries no process-wide logger state. The default sink forwards to
//! `tracing`; tests substitute a recording sink.

use std::fmt;

/// Lifecycle point at which a hook command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    PreUp,
    PostUp,
    PreDown,
    PostDown,
}

impl fmt::Display for HookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookStage::PreUp => write!(f, "PreUp"),
            HookStage::PostUp => write!(f, "PostUp"),
            HookStage::PreDown => write!(f, "PreDown"),
            HookStage::PostDown => write!(f, "PostDown"),
        }
    }
}

/// An action taken (or skipped) during a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    LinkCreated { iface: String },
    LinkUp { iface: String },
    LinkDown { iface: String },
    DeviceConfigured { iface: String, peers: usize },
    AddressKept { iface: String, addr: String },
    AddressAdded { iface: String, addr: String },
    AddressRemoved { iface: String, addr: String },
    RouteKept { iface: String, dest: String },
    RouteAdded { iface: String, dest: String },
    ForeignRoute { iface: String, dest: String },
    RouteRemoved { iface: String, dest: String },
    HookRan { stage: HookStage, command: String },
}

/// Sink for reconciliation events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: SyncEvent);
}

/// Forwards events to the `tracing` subscriber.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SyncEvent) {
        match event {
            SyncEvent::LinkCreated { iface } => {
                tracing::info!(%iface, "link created");
            }
            SyncEvent::LinkUp { iface } => {
                tracing::info!(%iface, "link up");
            }
            SyncEvent::LinkDown { iface } => {
                tracing::info!(%iface, "link down");
            }
            SyncEvent::DeviceConfigured { iface, peers } => {
                tracing::info!(%iface, peers, "device configured");
            }
            SyncEvent::AddressKept { iface, addr } => {
                tracing::debug!(%iface, %addr, "address present");
            }
            SyncEvent::AddressAdded { iface, addr } => {
                tracing::info!(%iface, %addr, "address added");
            }
            SyncEvent::AddressRemoved { iface, addr } => {
                tracing::info!(%iface, %addr, "address deleted");
            }
            SyncEvent::RouteKept { iface, dest } => {
                tracing::debug!(%iface, %dest, "route present");
            }
            SyncEvent::RouteAdded { iface, dest } => {
                tracing::info!(%iface, %dest, "route added");
            }
            SyncEvent::ForeignRoute { iface, dest } => {
                tracing::info!(%iface, %dest, "extra route found, removing");
            }
            SyncEvent::RouteRemoved { iface, dest } => {
                tracing::info!(%iface, %dest, "route deleted");
            }
            SyncEvent::HookRan { stage, command } => {
                tracing::info!(%stage, %command, "hook executed");
            }
        }
    }
}
