//! Link lifecycle management.
//!
//! A tunnel link moves `Absent -> Created -> Up`; both transitions are
//! no-ops when the link is already past them, and a failure at either
//! transition aborts the current reconciliation pass. Retry policy belongs
//! to the caller.

use crate::error::Result;
use crate::events::{EventSink, SyncEvent};
use crate::platform::traits::{DeviceControl, LinkHandle};

/// Ensure the named interface exists, creating it when absent.
pub async fn ensure_interface(
    dev: &dyn DeviceControl,
    name: &str,
    events: &dyn EventSink,
) -> Result<LinkHandle> {
    if let Some(link) = dev.lookup_interface(name).await? {
        tracing::debug!(iface = %name, index = link.index, "link already exists");
        return Ok(link);
    }

    let link = dev.create_interface(name).await?;
    events.emit(SyncEvent::LinkCreated {
        iface: name.to_string(),
    });
    Ok(link)
}

/// Drive the named interface to administratively up, creating it first
/// when needed.
pub async fn ensure_up(
    dev: &dyn DeviceControl,
    name: &str,
    events: &dyn EventSink,
) -> Result<LinkHandle> {
    let link = ensure_interface(dev, name, events).await?;
    dev.set_up(&link).await?;
    events.emit(SyncEvent::LinkUp {
        iface: name.to_string(),
    });
    Ok(link)
}
