use ini::Ini;
use ipnet::IpNet;
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::keys::{decode_private_key, decode_public_key};

use super::types::{InterfaceConfig, PeerConfig, RouteTable, WgConfig};

/// Parse a WireGuard configuration file
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<WgConfig> {
    let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse(e.to_string()))?;
    parse_ini(&ini)
}

/// Parse a WireGuard configuration from a string
pub fn parse_config_str(content: &str) -> Result<WgConfig> {
    let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    parse_ini(&ini)
}

fn parse_ini(ini: &Ini) -> Result<WgConfig> {
    let mut interface: Option<InterfaceConfig> = None;
    let mut peers: Vec<PeerConfig> = Vec::new();

    for (section, props) in ini.iter() {
        match section {
            Some("Interface") => {
                interface = Some(parse_interface_section(props)?);
            }
            Some("Peer") => {
                peers.push(parse_peer_section(props)?);
            }
            _ => {
                // Ignore unknown sections
            }
        }
    }

    let interface = interface.ok_or(ConfigError::MissingField("Interface section"))?;

    Ok(WgConfig { interface, peers })
}

fn parse_interface_section(props: &ini::Properties) -> Result<InterfaceConfig> {
    let private_key = props
        .get("PrivateKey")
        .ok_or(ConfigError::MissingField("PrivateKey"))?;
    let private_key = decode_private_key(private_key)?;

    let mut addresses = Vec::new();
    for value in props.get_all("Address") {
        addresses.extend(parse_address_list(value)?);
    }

    let mut dns = Vec::new();
    for value in props.get_all("DNS") {
        dns.extend(parse_dns_list(value)?);
    }

    let listen_port = props
        .get("ListenPort")
        .map(|s| {
            s.parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(s.to_string()))
        })
        .transpose()?;

    let mtu = props
        .get("MTU")
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| ConfigError::Parse(format!("Invalid MTU: {}", s)))
        })
        .transpose()?;

    let table = props
        .get("Table")
        .map(|s| s.parse::<RouteTable>())
        .transpose()?
        .unwrap_or_default();

    let save_config = props
        .get("SaveConfig")
        .map(|s| {
            s.trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::Parse(format!("Invalid SaveConfig: {}", s)))
        })
        .transpose()?
        .unwrap_or(false);

    Ok(InterfaceConfig {
        private_key,
        addresses,
        listen_port,
        dns,
        mtu,
        table,
        pre_up: props.get("PreUp").map(String::from),
        post_up: props.get("PostUp").map(String::from),
        pre_down: props.get("PreDown").map(String::from),
        post_down: props.get("PostDown").map(String::from),
        save_config,
    })
}

fn parse_peer_section(props: &ini::Properties) -> Result<PeerConfig> {
    let public_key = props
        .get("PublicKey")
        .ok_or(ConfigError::MissingField("PublicKey"))?;
    let public_key = decode_public_key(public_key)?;

    // The canonical spelling is AllowedIps; wg(8) uses AllowedIPs.
    let raw_allowed = props.get("AllowedIps").or_else(|| props.get("AllowedIPs"));

    let mut allowed_ips = Vec::new();
    if let Some(raw) = raw_allowed {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in raw.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if !seen.insert(entry) {
                return Err(ConfigError::DuplicateAllowedIp(entry.to_string()).into());
            }
            allowed_ips.push(parse_prefix(entry)?);
        }
    }

    let endpoint = props
        .get("Endpoint")
        .map(|s| parse_endpoint(s))
        .transpose()?;

    Ok(PeerConfig {
        public_key,
        allowed_ips,
        endpoint,
    })
}

/// Parse a comma-separated list of IP addresses/prefixes
fn parse_address_list(s: &str) -> Result<Vec<IpNet>> {
    s.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| parse_prefix(entry.trim()))
        .collect()
}

/// Parse a single address, defaulting to a host prefix when no mask is given
fn parse_prefix(s: &str) -> Result<IpNet> {
    if !s.contains('/') {
        let ip: IpAddr = s
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;
        let prefix = if ip.is_ipv4() { 32 } else { 128 };
        return IpNet::new(ip, prefix)
            .map_err(|_| ConfigError::InvalidAddress(s.to_string()).into());
    }
    s.parse::<IpNet>()
        .map_err(|_| ConfigError::InvalidAddress(s.to_string()).into())
}

/// Parse a comma-separated list of DNS servers
fn parse_dns_list(s: &str) -> Result<Vec<IpAddr>> {
    s.split(',')
        .filter(|entry| !entry.trim().is_empty())
        .map(|entry| {
            entry
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidAddress(entry.trim().to_string()).into())
        })
        .collect()
}

/// Parse an endpoint (host:port)
fn parse_endpoint(s: &str) -> Result<SocketAddr> {
    let s = s.trim();

    if s.starts_with('[') {
        // IPv6 format: [host]:port
        let close_bracket = s
            .find(']')
            .ok_or_else(|| ConfigError::InvalidEndpoint(s.to_string()))?;
        let colon = s[close_bracket..]
            .find(':')
            .ok_or_else(|| ConfigError::InvalidEndpoint(s.to_string()))?;
        let port_str = &s[close_bracket + colon + 1..];
        let host_str = &s[1..close_bracket];

        let host: IpAddr = host_str
            .parse()
            .map_err(|_| ConfigError::InvalidEndpoint(s.to_string()))?;
        let port: u16 = port_str
            .parse()
            .map_err(|_| ConfigError::InvalidEndpoint(s.to_string()))?;

        Ok(SocketAddr::new(host, port))
    } else {
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let last_colon = s
            .rfind(':')
            .ok_or_else(|| ConfigError::InvalidEndpoint(s.to_string()))?;
        let host_str = &s[..last_colon];
        let port_str = &s[last_colon + 1..];

        let host: IpAddr = host_str
            .parse()
            .map_err(|_| ConfigError::InvalidEndpoint(format!("Cannot resolve hostname: {}", s)))?;
        let port: u16 = port_str
            .parse()
            .map_err(|_| ConfigError::InvalidEndpoint(s.to_string()))?;

        Ok(SocketAddr::new(host, port))
    }
}
