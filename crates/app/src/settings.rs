//! Settings are layered: optional TOML file, then `STRATIFY_*` environment
//! variables (nested keys separated by `__`), then command-line flags.
use serde::Deserialize;

use crate::{cli::Cli, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/stratify.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub level: String,
    pub store: StoreSettings,
    pub contact: Option<ContactSettings>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            store: StoreSettings::default(),
            contact: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub project_id: String,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    /// Firebase ID token of the signed-in user.
    pub id_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSettings {
    pub endpoint: String,
}

pub fn load(cli: &Cli) -> Result<Settings> {
    let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(
        config::Environment::with_prefix("STRATIFY")
            .prefix_separator("_")
            .separator("__"),
    );
    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(level) = &cli.level {
        settings.level = level.clone();
    }
    if let Some(project_id) = &cli.project_id {
        settings.store.project_id = project_id.clone();
    }
    if let Some(base_url) = &cli.base_url {
        settings.store.base_url = Some(base_url.clone());
    }

    Ok(settings)
}
