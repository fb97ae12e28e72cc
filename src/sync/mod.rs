//! The reconciliation engine.
//!
//! Each pass re-reads kernel state fresh and converges it to the desired
//! configuration: link lifecycle, device configuration, then address and
//! route sets. Nothing is retained between passes; repeated invocation is
//! the recovery mechanism for partial failure.

pub mod addresses;
pub mod diff;
pub mod link;
pub mod orchestrator;
pub mod routes;

#[cfg(test)]
pub(crate) mod testing;

pub use addresses::sync_addresses;
pub use diff::{DiffSet, Presence};
pub use link::{ensure_interface, ensure_up};
pub use orchestrator::Reconciler;
pub use routes::sync_routes;
