use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

/// Starts one scraper run without waiting for it to finish.
#[async_trait]
pub(crate) trait ScraperLauncher: Send + Sync {
    async fn launch(&self) -> anyhow::Result<()>;
}

pub(crate) struct NoopLauncher;

#[async_trait]
impl ScraperLauncher for NoopLauncher {
    async fn launch(&self) -> anyhow::Result<()> {
        info!("no scraper command configured; run recorded only");
        Ok(())
    }
}

pub(crate) struct CommandLauncher {
    shell: String,
    shell_flag: &'static str,
    command: String,
}

impl CommandLauncher {
    pub(crate) fn new(command: impl Into<String>) -> Self {
        #[cfg(windows)]
        let (shell, shell_flag) = ("cmd".to_string(), "/C");
        #[cfg(not(windows))]
        let (shell, shell_flag) = ("sh".to_string(), "-c");

        Self {
            shell,
            shell_flag,
            command: command.into(),
        }
    }

    #[cfg(test)]
    fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }
}

#[async_trait]
impl ScraperLauncher for CommandLauncher {
    async fn launch(&self) -> anyhow::Result<()> {
        let mut child = Command::new(&self.shell)
            .arg(self.shell_flag)
            .arg(&self.command)
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to spawn scraper command '{}'", self.command))?;

        let pid = child.id();
        info!(?pid, command = %self.command, "scraper process spawned");
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if status.success() => info!(?pid, "scraper process finished"),
                Ok(status) => warn!(?pid, %status, "scraper process exited with failure"),
                Err(error) => warn!(?pid, %error, "failed to wait on scraper process"),
            }
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/launcher_tests.rs"]
mod tests;
