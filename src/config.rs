//! Configuration handling for the wizard

use crate::cli::Cli;
use crate::state::UserContext;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DATA_ENV: &str = "FAMILY_WIZARD_DATA";
const MEMBER_ENV: &str = "FAMILY_WIZARD_MEMBER";

/// User configuration persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WizardConfig {
    /// JSON data file with villages and family members
    pub data_file: Option<PathBuf>,
    /// JSON-lines file receiving submissions
    pub outbox_file: Option<PathBuf>,
    /// Signed-in member id
    pub member_id: Option<String>,
    /// Signed-in member display name
    pub member_name: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_file: PathBuf,
    pub outbox_file: PathBuf,
    pub context: UserContext,
    /// Record to edit; `None` creates a new family member
    pub record_id: Option<String>,
}

impl WizardConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("org", "community", "family-wizard")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn default_data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Load configuration from file; a missing file yields the defaults
    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: WizardConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Settings for this run from the config file, environment and flags
    pub fn settings_for(cli: &Cli) -> Result<Settings> {
        match Self::config_path() {
            Some(path) => Self::settings_at(&path, cli),
            None => Ok(Self::default().with_env().resolve(cli)),
        }
    }

    /// Only flags are persisted with `--save-config`; environment overrides
    /// are applied after saving
    fn settings_at(path: &Path, cli: &Cli) -> Result<Settings> {
        let mut config = Self::load_from(path)?;
        if cli.save_config {
            config.remember(cli);
            config.save_to(path)?;
            tracing::info!("Saved configuration to {}", path.display());
        }
        Ok(config.with_env().resolve(cli))
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(data) = std::env::var(DATA_ENV) {
            self.data_file = Some(PathBuf::from(data));
        }
        if let Ok(member) = std::env::var(MEMBER_ENV) {
            self.member_id = Some(member);
        }
        self
    }

    /// Copy the path and member flags into the config so later runs reuse them
    pub fn remember(&mut self, cli: &Cli) {
        if let Some(data) = &cli.data {
            self.data_file = Some(data.clone());
        }
        if let Some(outbox) = &cli.outbox {
            self.outbox_file = Some(outbox.clone());
        }
        if let Some(member) = &cli.member {
            self.member_id = Some(member.clone());
        }
    }

    /// Merge command-line flags over the config; flags win
    pub fn resolve(self, cli: &Cli) -> Settings {
        let data_dir = Self::default_data_dir();
        let data_file = cli
            .data
            .clone()
            .or(self.data_file)
            .unwrap_or_else(|| data_dir.join("directory.json"));
        let outbox_file = cli
            .outbox
            .clone()
            .or(self.outbox_file)
            .unwrap_or_else(|| data_dir.join("outbox.jsonl"));
        let member_id = cli.member.clone().or(self.member_id);
        let display_name = self
            .member_name
            .or_else(|| member_id.clone())
            .unwrap_or_else(|| "Guest".to_string());

        Settings {
            data_file,
            outbox_file,
            context: UserContext::new(member_id, display_name),
            record_id: cli.edit.clone(),
        }
    }
}
