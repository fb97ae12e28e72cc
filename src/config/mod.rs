pub mod parser;
pub mod render;
pub mod types;

pub use parser::{parse_config_file, parse_config_str};
pub use render::{render, render_device};
pub use types::{InterfaceConfig, PeerConfig, RouteTable, WgConfig};
