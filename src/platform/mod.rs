pub mod traits;

#[cfg(target_os = "linux")]
pub mod linux;

pub use traits::{DeviceControl, LinkHandle, NetworkManager};

#[cfg(target_os = "linux")]
pub use linux::{LinuxDeviceControl, LinuxNetworkManager};
