//! Lifecycle hook execution.
//!
//! PreUp/PostUp/PreDown/PostDown commands are opaque shell snippets run at
//! defined lifecycle points. Execution goes through an injected
//! [`HookRunner`] so the reconciliation core never spawns processes itself
//! and tests can substitute a fake runner.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{HookError, Result};

/// Capability to run one hook command.
#[async_trait]
pub trait HookRunner: Send + Sync {
    async fn run(&self, command: &str) -> Result<()>;
}

/// Runs hooks through `sh -c`.
pub struct ShellHookRunner;

#[async_trait]
impl HookRunner for ShellHookRunner {
    async fn run(&self, command: &str) -> Result<()> {
        tracing::debug!(%command, "running hook");

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .await
            .map_err(|e| HookError::Spawn {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            return Err(HookError::Exit {
                command: command.to_string(),
                status: status.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Expand the `%i` token to the interface name.
pub fn expand_interface(command: &str, iface: &str) -> String {
    command.replace("%i", iface)
}
