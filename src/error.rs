use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WgError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),

    #[error("Address sync error: {0}")]
    Address(#[from] AddressError),

    #[error("Route sync error: {0}")]
    Route(#[from] RouteError),

    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid key format: {0}")]
    InvalidKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port: {0}")]
    InvalidPort(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid routing table: {0}")]
    InvalidTable(String),

    #[error("Duplicate allowed IP: {0}")]
    DuplicateAllowedIp(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("File error: {0}")]
    File(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Failed to create interface {iface}: {reason}")]
    Create { iface: String, reason: String },

    #[error("Failed to set interface {iface} up: {reason}")]
    SetUp { iface: String, reason: String },

    #[error("Failed to set interface {iface} down: {reason}")]
    SetDown { iface: String, reason: String },

    #[error("Interface {0} not found")]
    NotFound(String),

    #[error("Netlink error: {0}")]
    Netlink(String),
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Failed to configure device {iface}: {reason}")]
    Configure { iface: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AddressError {
    #[error("Failed to list addresses on {iface}: {reason}")]
    List { iface: String, reason: String },

    #[error("Failed to add address {addr} to {iface}: {reason}")]
    Add {
        iface: String,
        addr: String,
        reason: String,
    },

    #[error("Failed to delete address {addr} from {iface}: {reason}")]
    Del {
        iface: String,
        addr: String,
        reason: String,
    },

    #[error("Malformed observed address {entry} on {iface}")]
    Observed { iface: String, entry: String },
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Failed to list routes on {iface}: {reason}")]
    List { iface: String, reason: String },

    #[error("Failed to add route {dest} via {iface}: {reason}")]
    Add {
        iface: String,
        dest: String,
        reason: String,
    },

    #[error("Failed to delete route {dest} via {iface}: {reason}")]
    Del {
        iface: String,
        dest: String,
        reason: String,
    },

    #[error("Malformed observed route {entry} on {iface}")]
    Observed { iface: String, entry: String },
}

#[derive(Error, Debug)]
pub enum HookError {
    #[error("Failed to spawn hook `{command}`: {reason}")]
    Spawn { command: String, reason: String },

    #[error("Hook `{command}` exited with {status}")]
    Exit { command: String, status: String },
}

pub type Result<T> = std::result::Result<T, WgError>;
