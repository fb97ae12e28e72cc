//! Canonical configuration text rendering.
//!
//! Two renderings exist: [`render`] produces the full canonical file with
//! every declared field, and [`render_device`] produces the subset the
//! WireGuard driver accepts (keys, listen port, peers), used when pushing
//! configuration with `wg syncconf`.

use std::fmt::Write;

use crate::config::types::{RouteTable, WgConfig};
use crate::error::{ConfigError, Result};
use crate::keys::encode_key;

/// Render the canonical configuration file text.
///
/// Addresses and peers are emitted in stored order. Optional fields that
/// are unset produce no line at all.
pub fn render(config: &WgConfig) -> Result<String> {
    let mut out = String::new();
    render_into(config, &mut out).map_err(|e| ConfigError::Render(e.to_string()))?;
    Ok(out)
}

fn render_into(config: &WgConfig, out: &mut String) -> std::fmt::Result {
    let iface = &config.interface;

    writeln!(out, "[Interface]")?;
    for addr in &iface.addresses {
        writeln!(out, "Address = {}", addr)?;
    }
    for dns in &iface.dns {
        writeln!(out, "DNS = {}", dns)?;
    }
    writeln!(out, "PrivateKey = {}", encode_key(&iface.private_key.to_bytes()))?;
    if let Some(port) = iface.listen_port {
        writeln!(out, "ListenPort = {}", port)?;
    }
    if let Some(mtu) = iface.mtu {
        writeln!(out, "MTU = {}", mtu)?;
    }
    if iface.table != RouteTable::Auto {
        writeln!(out, "Table = {}", iface.table)?;
    }
    if let Some(cmd) = &iface.pre_up {
        writeln!(out, "PreUp = {}", cmd)?;
    }
    if let Some(cmd) = &iface.post_up {
        writeln!(out, "PostUp = {}", cmd)?;
    }
    if let Some(cmd) = &iface.pre_down {
        writeln!(out, "PreDown = {}", cmd)?;
    }
    if let Some(cmd) = &iface.post_down {
        writeln!(out, "PostDown = {}", cmd)?;
    }
    if iface.save_config {
        writeln!(out, "SaveConfig = true")?;
    }

    for peer in &config.peers {
        writeln!(out)?;
        writeln!(out, "[Peer]")?;
        writeln!(out, "PublicKey = {}", encode_key(peer.public_key.as_bytes()))?;
        let allowed: Vec<String> = peer.allowed_ips.iter().map(|n| n.to_string()).collect();
        writeln!(out, "AllowedIps = {}", allowed.join(", "))?;
        if let Some(endpoint) = peer.endpoint {
            writeln!(out, "Endpoint = {}", endpoint)?;
        }
    }

    Ok(())
}

/// Render the driver subset of the configuration.
///
/// Only keys understood by `wg setconf`/`wg syncconf` are emitted; the
/// tool requires the `AllowedIPs` spelling.
pub fn render_device(config: &WgConfig) -> Result<String> {
    let mut out = String::new();
    render_device_into(config, &mut out).map_err(|e| ConfigError::Render(e.to_string()))?;
    Ok(out)
}

fn render_device_into(config: &WgConfig, out: &mut String) -> std::fmt::Result {
    let iface = &config.interface;

    writeln!(out, "[Interface]")?;
    writeln!(out, "PrivateKey = {}", encode_key(&iface.private_key.to_bytes()))?;
    if let Some(port) = iface.listen_port {
        writeln!(out, "ListenPort = {}", port)?;
    }

    for peer in &config.peers {
        writeln!(out)?;
        writeln!(out, "[Peer]")?;
        writeln!(out, "PublicKey = {}", encode_key(peer.public_key.as_bytes()))?;
        if !peer.allowed_ips.is_empty() {
            let allowed: Vec<String> = peer.allowed_ips.iter().map(|n| n.to_string()).collect();
            writeln!(out, "AllowedIPs = {}", allowed.join(", "))?;
        }
        if let Some(endpoint) = peer.endpoint {
            writeln!(out, "Endpoint = {}", endpoint)?;
        }
    }

    Ok(())
}
