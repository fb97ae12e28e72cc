//! WireGuard driver control on Linux.
//!
//! Link creation and administrative state go through rtnetlink; the
//! cryptographic device configuration (keys, listen port, peers) is pushed
//! with `wg syncconf`, which replaces the driver's peer state atomically.

use async_trait::async_trait;
use futures::TryStreamExt;
use netlink_packet_route::link::nlas::{Info, InfoKind, Nla as LinkNla};
use rtnetlink::Handle;
use std::io::Write;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::{render_device, WgConfig};
use crate::error::{DeviceError, LinkError, Result};
use crate::platform::traits::{DeviceControl, LinkHandle};

// Errno returned by RTM_GETLINK for an unknown interface name.
const ENODEV: i32 = 19;

/// Linux implementation of [`DeviceControl`]
pub struct LinuxDeviceControl {
    handle: Handle,
    wg_path: String,
}

impl LinuxDeviceControl {
    pub async fn new() -> Result<Self> {
        let (connection, handle, _) =
            rtnetlink::new_connection().map_err(|e| LinkError::Netlink(e.to_string()))?;

        tokio::spawn(connection);

        Ok(Self {
            handle,
            wg_path: "wg".to_string(),
        })
    }

    /// Use a custom path to the `wg` tool
    pub fn with_wg_path(mut self, path: impl Into<String>) -> Self {
        self.wg_path = path.into();
        self
    }

    /// Write the device configuration to a 0600 tempfile for `wg syncconf`.
    fn write_config_file(link: &LinkHandle, config: &WgConfig) -> Result<tempfile::NamedTempFile> {
        let rendered = render_device(config)?;

        let mut file = tempfile::NamedTempFile::new().map_err(|e| DeviceError::Configure {
            iface: link.name.clone(),
            reason: format!("cannot create config tempfile: {}", e),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(file.path(), perms).map_err(|e| DeviceError::Configure {
                iface: link.name.clone(),
                reason: format!("cannot restrict config tempfile: {}", e),
            })?;
        }

        file.write_all(rendered.as_bytes())
            .map_err(|e| DeviceError::Configure {
                iface: link.name.clone(),
                reason: format!("cannot write config tempfile: {}", e),
            })?;

        Ok(file)
    }
}

#[async_trait]
impl DeviceControl for LinuxDeviceControl {
    async fn lookup_interface(&self, name: &str) -> Result<Option<LinkHandle>> {
        let mut links = self
            .handle
            .link()
            .get()
            .match_name(name.to_string())
            .execute();

        match links.try_next().await {
            Ok(Some(link)) => Ok(Some(LinkHandle::new(name, link.header.index))),
            Ok(None) => Ok(None),
            Err(rtnetlink::Error::NetlinkError(e)) if e.raw_code() == -ENODEV => Ok(None),
            Err(e) => Err(LinkError::Netlink(e.to_string()).into()),
        }
    }

    async fn create_interface(&self, name: &str) -> Result<LinkHandle> {
        let mut request = self.handle.link().add();
        request.message_mut().nlas.extend(wireguard_link_nlas(name));

        request.execute().await.map_err(|e| LinkError::Create {
            iface: name.to_string(),
            reason: e.to_string(),
        })?;

        self.lookup_interface(name)
            .await?
            .ok_or_else(|| {
                LinkError::Create {
                    iface: name.to_string(),
                    reason: "interface missing after creation".to_string(),
                }
                .into()
            })
    }

    async fn set_up(&self, link: &LinkHandle) -> Result<()> {
        self.handle
            .link()
            .set(link.index)
            .up()
            .execute()
            .await
            .map_err(|e| LinkError::SetUp {
                iface: link.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn set_down(&self, link: &LinkHandle) -> Result<()> {
        self.handle
            .link()
            .set(link.index)
            .down()
            .execute()
            .await
            .map_err(|e| LinkError::SetDown {
                iface: link.name.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }

    async fn push_config(&self, link: &LinkHandle, config: &WgConfig) -> Result<()> {
        let config_file = Self::write_config_file(link, config)?;

        tracing::debug!(iface = %link.name, "pushing device configuration");

        let output = Command::new(&self.wg_path)
            .arg("syncconf")
            .arg(&link.name)
            .arg(config_file.path())
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| DeviceError::Configure {
                iface: link.name.clone(),
                reason: format!("cannot run {}: {}", self.wg_path, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeviceError::Configure {
                iface: link.name.clone(),
                reason: stderr.trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Attributes for an RTM_NEWLINK creating a wireguard-kind interface.
fn wireguard_link_nlas(name: &str) -> Vec<LinkNla> {
    vec![
        LinkNla::IfName(name.to_string()),
        LinkNla::Info(vec![Info::Kind(InfoKind::Wireguard)]),
    ]
}
