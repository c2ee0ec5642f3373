pub mod auth;
pub mod envs;
pub mod export;
pub mod import;
pub mod init;
pub mod list;

pub use auth::{auth_command, AuthArgs};
pub use envs::envs_command;
pub use export::{export_command, ExportArgs};
pub use import::{import_command, ImportArgs};
pub use init::init_command;
pub use list::{list_command, ListArgs};

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::debug;
use pingone_forms::api::models::EnvironmentCredential;
use pingone_forms::api::ClientManager;
use pingone_forms::config::Config;
use pingone_forms::ui::prompt_environment_selection;
use std::path::Path;

/// Loaded configuration plus the client manager shared by one command run
pub struct Session {
    pub config: Config,
    pub manager: ClientManager,
    pub interactive: bool,
}

impl Session {
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let manager = ClientManager::new(config.platform.clone(), config.resilience.clone())
            .context("Failed to initialize HTTP client")?;
        let interactive = std::io::stdin().is_terminal();
        debug!("Session ready (interactive: {})", interactive);

        Ok(Self {
            config,
            manager,
            interactive,
        })
    }

    /// Environment named by `--env`, or chosen interactively
    pub fn resolve_environment(
        &self,
        name: Option<&str>,
        prompt: &str,
    ) -> Result<&EnvironmentCredential> {
        if let Some(name) = name {
            return Ok(self.config.find_environment(name)?);
        }

        match self.config.environments.as_slice() {
            [] => anyhow::bail!(
                "No environments configured in {}",
                self.config.path.display()
            ),
            [only] => Ok(only),
            environments if self.interactive => prompt_environment_selection(prompt, environments),
            _ => anyhow::bail!(
                "--env is required when not running in a terminal (available: {})",
                self.config.environment_names().join(", ")
            ),
        }
    }

    /// Ask for confirmation unless `--yes` was given
    pub fn confirm(&self, prompt: &str, yes: bool) -> Result<bool> {
        if yes {
            return Ok(true);
        }
        if !self.interactive {
            anyhow::bail!("--yes is required when not running in a terminal");
        }
        pingone_forms::ui::prompt_confirmation(prompt, true)
    }
}
