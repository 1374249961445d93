//! Settings file loading and command-line overrides.

use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Format, Json};
use pchat::{ConfigError, DEFAULT_MODEL, Settings};
use pprovider::DEFAULT_REQUEST_TIMEOUT;
use serde::Deserialize;

use crate::cli::Cli;

/// Shape of the settings file. Only the `XAI` section is read.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(rename = "XAI", default)]
    pub xai: SettingsFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SettingsFile {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub system_prompt: Option<String>,
    pub models: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

/// Everything the binary needs before the first prompt.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Models offered at startup, in menu order.
    pub models: Vec<String>,
    /// Set when the model came from the command line.
    pub model_pinned: bool,
    pub timeout: Option<Duration>,
}

impl LoadedConfig {
    pub fn needs_model_selection(&self) -> bool {
        !self.model_pinned && self.models.len() > 1
    }
}

pub fn default_models() -> Vec<String> {
    vec![DEFAULT_MODEL.to_string(), "grok-3-mini".to_string()]
}

/// Reads the settings file. A file that does not exist yields an empty
/// configuration so flags and the environment can supply everything.
pub fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    if !path.exists() {
        tracing::debug!(
            phase = "config",
            event = "file_missing",
            path = %path.display()
        );
        return Ok(ConfigFile::default());
    }

    Figment::new()
        .merge(Json::file(path))
        .extract::<ConfigFile>()
        .map_err(|err| ConfigError::Load(format!("{}: {err}", path.display())))
}

/// Applies command-line values over file values and validates the result.
pub fn resolve(file: ConfigFile, cli: &Cli) -> Result<LoadedConfig, ConfigError> {
    let section = file.xai;

    let mut builder = Settings::builder();
    if let Some(api_key) = non_blank(&cli.api_key).or(section.api_key) {
        builder = builder.api_key(api_key);
    }
    if let Some(api_url) = non_blank(&cli.api_url).or(section.api_url) {
        builder = builder.api_url(api_url);
    }
    if let Some(model) = non_blank(&cli.model).or(section.model) {
        builder = builder.model(model);
    }
    if let Some(max_tokens) = cli.max_tokens.or(section.max_tokens) {
        builder = builder.max_tokens(max_tokens);
    }
    if let Some(temperature) = cli.temperature.or(section.temperature) {
        builder = builder.temperature(temperature);
    }
    if let Some(system_prompt) = section.system_prompt {
        builder = builder.system_prompt(system_prompt);
    }

    let settings = builder.build()?;

    let models = section
        .models
        .map(|models| {
            models
                .into_iter()
                .map(|model| model.trim().to_string())
                .filter(|model| !model.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|models| !models.is_empty())
        .unwrap_or_else(default_models);

    let timeout = match cli.timeout_secs.or(section.timeout_secs) {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => Some(DEFAULT_REQUEST_TIMEOUT),
    };

    Ok(LoadedConfig {
        settings,
        models,
        model_pinned: non_blank(&cli.model).is_some(),
        timeout,
    })
}

/// An empty flag or environment variable counts as not given.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|value| !value.trim().is_empty())
}

pub fn load(cli: &Cli) -> Result<LoadedConfig, ConfigError> {
    let file = read_file(&cli.config)?;
    let loaded = resolve(file, cli)?;

    tracing::debug!(
        phase = "config",
        event = "loaded",
        api_url = loaded.settings.api_url(),
        model = loaded.settings.model(),
        max_tokens = loaded.settings.max_tokens(),
        temperature = loaded.settings.temperature(),
        catalog = loaded.models.len()
    );

    Ok(loaded)
}
