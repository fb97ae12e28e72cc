//! In-memory fakes for the platform and hook boundaries.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use ipnet::IpNet;
use x25519_dalek::PublicKey;

use crate::config::{PeerConfig, WgConfig};
use crate::error::{AddressError, DeviceError, HookError, LinkError, Result};
use crate::events::{EventSink, SyncEvent};
use crate::hooks::HookRunner;
use crate::platform::traits::{DeviceControl, LinkHandle, NetworkManager};

/// One recorded [`NetworkManager`] call, with the argument rendered as its
/// canonical string so tests can assert exact call sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetCall {
    ListAddresses,
    AddAddress(String),
    DelAddress(String),
    ListRoutes,
    AddRoute(String),
    DelRoute(String),
    SetMtu(u32),
}

/// Fake kernel network state: mutations apply to in-memory address and
/// route sets, so convergence can be checked against the final state.
pub struct MockNet {
    addresses: Mutex<Vec<IpNet>>,
    routes: Mutex<Vec<IpNet>>,
    calls: Mutex<Vec<NetCall>>,
    fail_add_address: AtomicBool,
}

impl MockNet {
    pub fn new() -> Self {
        Self {
            addresses: Mutex::new(Vec::new()),
            routes: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            fail_add_address: AtomicBool::new(false),
        }
    }

    pub fn with_addresses(self, specs: &[&str]) -> Self {
        *self.addresses.lock().unwrap() = specs.iter().map(|s| s.parse().unwrap()).collect();
        self
    }

    pub fn with_routes(self, specs: &[&str]) -> Self {
        *self.routes.lock().unwrap() = specs.iter().map(|s| s.parse().unwrap()).collect();
        self
    }

    pub fn fail_add_address(self) -> Self {
        self.fail_add_address.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<NetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn addresses(&self) -> Vec<IpNet> {
        self.addresses.lock().unwrap().clone()
    }

    pub fn routes(&self) -> Vec<IpNet> {
        self.routes.lock().unwrap().clone()
    }

    fn record(&self, call: NetCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl NetworkManager for MockNet {
    async fn list_addresses(&self, _link: &LinkHandle) -> Result<Vec<IpNet>> {
        self.record(NetCall::ListAddresses);
        Ok(self.addresses())
    }

    async fn add_address(&self, link: &LinkHandle, addr: IpNet) -> Result<()> {
        self.record(NetCall::AddAddress(addr.to_string()));
        if self.fail_add_address.load(Ordering::SeqCst) {
            return Err(AddressError::Add {
                iface: link.name.clone(),
                addr: addr.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        self.addresses.lock().unwrap().push(addr);
        Ok(())
    }

    async fn del_address(&self, _link: &LinkHandle, addr: IpNet) -> Result<()> {
        self.record(NetCall::DelAddress(addr.to_string()));
        self.addresses.lock().unwrap().retain(|a| *a != addr);
        Ok(())
    }

    async fn list_routes(&self, _link: &LinkHandle) -> Result<Vec<IpNet>> {
        self.record(NetCall::ListRoutes);
        Ok(self.routes())
    }

    async fn add_route(&self, _link: &LinkHandle, dest: IpNet) -> Result<()> {
        self.record(NetCall::AddRoute(dest.to_string()));
        self.routes.lock().unwrap().push(dest);
        Ok(())
    }

    async fn del_route(&self, _link: &LinkHandle, dest: IpNet) -> Result<()> {
        self.record(NetCall::DelRoute(dest.to_string()));
        self.routes.lock().unwrap().retain(|r| *r != dest);
        Ok(())
    }

    async fn set_mtu(&self, _link: &LinkHandle, mtu: u32) -> Result<()> {
        self.record(NetCall::SetMtu(mtu));
        Ok(())
    }
}

/// One recorded [`DeviceControl`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevCall {
    Lookup(String),
    Create(String),
    SetUp(String),
    SetDown(String),
    PushConfig(String),
}

/// Fake tunnel driver tracking which interfaces exist.
pub struct MockDevice {
    links: Mutex<Vec<LinkHandle>>,
    calls: Mutex<Vec<DevCall>>,
    next_index: AtomicU32,
    fail_create: AtomicBool,
    fail_push: AtomicBool,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            links: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_index: AtomicU32::new(1),
            fail_create: AtomicBool::new(false),
            fail_push: AtomicBool::new(false),
        }
    }

    pub fn with_existing(names: &[&str]) -> Self {
        let dev = Self::new();
        {
            let mut links = dev.links.lock().unwrap();
            for name in names {
                let index = dev.next_index.fetch_add(1, Ordering::SeqCst);
                links.push(LinkHandle::new(*name, index));
            }
        }
        dev
    }

    pub fn fail_create(self) -> Self {
        self.fail_create.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_push(self) -> Self {
        self.fail_push.store(true, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<DevCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DevCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DeviceControl for MockDevice {
    async fn lookup_interface(&self, name: &str) -> Result<Option<LinkHandle>> {
        self.record(DevCall::Lookup(name.to_string()));
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.name == name)
            .cloned())
    }

    async fn create_interface(&self, name: &str) -> Result<LinkHandle> {
        self.record(DevCall::Create(name.to_string()));
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(LinkError::Create {
                iface: name.to_string(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        let index = self.next_index.fetch_add(1, Ordering::SeqCst);
        let link = LinkHandle::new(name, index);
        self.links.lock().unwrap().push(link.clone());
        Ok(link)
    }

    async fn set_up(&self, link: &LinkHandle) -> Result<()> {
        self.record(DevCall::SetUp(link.name.clone()));
        Ok(())
    }

    async fn set_down(&self, link: &LinkHandle) -> Result<()> {
        self.record(DevCall::SetDown(link.name.clone()));
        Ok(())
    }

    async fn push_config(&self, link: &LinkHandle, _config: &WgConfig) -> Result<()> {
        self.record(DevCall::PushConfig(link.name.clone()));
        if self.fail_push.load(Ordering::SeqCst) {
            return Err(DeviceError::Configure {
                iface: link.name.clone(),
                reason: "injected failure".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Records hook commands instead of spawning a shell.
pub struct MockHooks {
    commands: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MockHooks {
    pub fn new() -> Self {
        Self {
            commands: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn fail(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl HookRunner for MockHooks {
    async fn run(&self, command: &str) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(HookError::Exit {
                command: command.to_string(),
                status: "exit status: 1".to_string(),
            }
            .into());
        }
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

/// Collects emitted events for assertion.
pub struct RecordingSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Peer with a deterministic key derived from `n` and the given AllowedIPs.
pub fn peer(n: u8, cidrs: &[&str]) -> PeerConfig {
    let mut peer = PeerConfig::new(PublicKey::from([n; 32]));
    peer.allowed_ips = cidrs.iter().map(|c| c.parse().unwrap()).collect();
    peer
}
