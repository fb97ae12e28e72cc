//! wgsync - Declarative WireGuard interface manager
//!
//! Reads a wg-quick style configuration file and converges a kernel
//! WireGuard interface to it: link lifecycle, device keys and peers,
//! IP addresses and AllowedIPs-derived routes. Each pass observes the
//! kernel fresh and applies only the differences, so re-running after a
//! partial failure completes the remaining work.
//!
//! # Example
//!
//! ```no_run
//! use wgsync::config::parse_config_file;
//!
//! let config = parse_config_file("wg0.conf").unwrap();
//! println!("Loaded {} peers", config.peers.len());
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod keys;
pub mod platform;
pub mod sync;

pub use error::{Result, WgError};
