pub mod device;
pub mod netlink;

pub use device::LinuxDeviceControl;
pub use netlink::LinuxNetworkManager;
