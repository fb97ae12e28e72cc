use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use crate::config::{parse_config_file, render, WgConfig};
use crate::error::{Result, WgError};
use crate::events::TracingSink;
use crate::hooks::ShellHookRunner;
use crate::keys::{decode_private_key, derive_public_key, encode_key, generate_private_key};
use crate::platform::linux::{LinuxDeviceControl, LinuxNetworkManager};
use crate::sync::Reconciler;

/// Resolve the interface name: explicit flag wins, otherwise the config
/// file stem (`/etc/wireguard/wg0.conf` -> `wg0`), matching wg-quick.
fn interface_name(config_path: &Path, interface: Option<String>) -> Result<String> {
    if let Some(name) = interface {
        return Ok(name);
    }

    config_path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            WgError::Other(format!(
                "Cannot derive interface name from {}; use -i/--interface",
                config_path.display()
            ))
        })
}

fn load(config_path: &Path, interface: Option<String>) -> Result<(WgConfig, String)> {
    let config = parse_config_file(config_path)?;
    let name = interface_name(config_path, interface)?;
    Ok((config, name))
}

/// Execute the 'up' command
pub async fn cmd_up(config_path: PathBuf, interface: Option<String>) -> Result<()> {
    let (config, name) = load(&config_path, interface)?;

    tracing::info!(iface = %name, config = %config_path.display(), "bringing interface up");

    let dev = LinuxDeviceControl::new().await?;
    let net = LinuxNetworkManager::new().await?;
    let events = TracingSink;

    Reconciler::new(&dev, &net, &ShellHookRunner, &events)
        .up(&name, &config)
        .await
}

/// Execute the 'down' command
pub async fn cmd_down(config_path: PathBuf, interface: Option<String>) -> Result<()> {
    let (config, name) = load(&config_path, interface)?;

    let dev = LinuxDeviceControl::new().await?;
    let net = LinuxNetworkManager::new().await?;
    let events = TracingSink;

    Reconciler::new(&dev, &net, &ShellHookRunner, &events)
        .down(&name, &config)
        .await
}

/// Execute the 'render' command
pub fn cmd_render(config_path: PathBuf) -> Result<()> {
    let config = parse_config_file(&config_path)?;
    print!("{}", render(&config)?);
    Ok(())
}

/// Execute the 'genkey' command
pub fn cmd_genkey() {
    let private_key = generate_private_key();
    println!("{}", encode_key(&private_key.to_bytes()));
}

/// Execute the 'pubkey' command
pub fn cmd_pubkey() -> Result<()> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| WgError::Other(format!("Failed to read from stdin: {}", e)))?;

    let private_key = decode_private_key(line.trim())?;
    let public_key = derive_public_key(&private_key);
    println!("{}", encode_key(public_key.as_bytes()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_name_from_stem() {
        let name = interface_name(Path::new("/etc/wireguard/wg0.conf"), None).unwrap();
        assert_eq!(name, "wg0");
    }

    #[test]
    fn test_interface_name_override_wins() {
        let name =
            interface_name(Path::new("/etc/wireguard/wg0.conf"), Some("tun9".to_string())).unwrap();
        assert_eq!(name, "tun9");
    }
}
