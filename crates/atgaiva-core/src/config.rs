use crate::gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient};
use crate::messages::Locale;
use crate::options::RestorationOptions;
use crate::secret_store::{self, SecretReference, SecretStoreError};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_DIR_NAME: &str = "atgaiva";
const CONFIG_FILE_NAME: &str = "config.toml";
const CURRENT_SCHEMA_VERSION: u32 = 1;
const API_KEY_SECRET_LABEL: &str = "gemini_api_key";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Errors that can occur when persisting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML serialization error: {0}")]
    Ser(#[from] toml::ser::Error),
    #[error("Secret storage error: {0}")]
    Secret(#[from] SecretStoreError),
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub gemini: GeminiPreferences,
    #[serde(default)]
    pub restoration: RestorationOptions,
    #[serde(default)]
    pub ui: UiPreferences,
    #[serde(default)]
    pub export: ExportPreferences,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            gemini: GeminiPreferences::default(),
            restoration: RestorationOptions::default(),
            ui: UiPreferences::default(),
            export: ExportPreferences::default(),
        }
    }
}

impl FileConfig {
    const fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SecretValue {
    Plain(String),
    Reference(SecretReference),
}

/// Settings for the Gemini restoration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiPreferences {
    #[serde(default)]
    pub api_key: Option<SecretValue>,
    #[serde(default = "GeminiPreferences::default_model")]
    pub model: String,
    #[serde(default = "GeminiPreferences::default_endpoint")]
    pub endpoint: String,
}

impl Default for GeminiPreferences {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::default_model(),
            endpoint: Self::default_endpoint(),
        }
    }
}

impl GeminiPreferences {
    fn default_model() -> String {
        DEFAULT_MODEL.to_string()
    }

    fn default_endpoint() -> String {
        DEFAULT_ENDPOINT.to_string()
    }

    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), SecretStoreError> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return self.clear_api_key();
        }

        if let Some(SecretValue::Reference(existing)) = self.api_key.as_ref() {
            // Stale entries are harmless; ignore failures here.
            let _ = secret_store::delete_secret(existing);
        }

        let reference = secret_store::store_secret(API_KEY_SECRET_LABEL, trimmed)?;
        self.api_key = Some(SecretValue::Reference(reference));
        Ok(())
    }

    pub fn clear_api_key(&mut self) -> Result<(), SecretStoreError> {
        if let Some(SecretValue::Reference(reference)) = self.api_key.as_ref() {
            secret_store::delete_secret(reference)?;
        }
        self.api_key = None;
        Ok(())
    }

    /// Move a plaintext key from the file into the secret store.
    pub fn migrate_api_key_secret(&mut self) -> Result<bool, SecretStoreError> {
        let Some(SecretValue::Plain(value)) = self.api_key.clone() else {
            return Ok(false);
        };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.api_key = None;
            return Ok(true);
        }

        let reference = secret_store::store_secret(API_KEY_SECRET_LABEL, trimmed)?;
        self.api_key = Some(SecretValue::Reference(reference));
        Ok(true)
    }

    pub fn stored_api_key(&self) -> Result<Option<String>, SecretStoreError> {
        match self.api_key.as_ref() {
            Some(SecretValue::Reference(reference)) => secret_store::load_secret(reference),
            Some(SecretValue::Plain(value)) => Ok(Some(value.clone())),
            None => Ok(None),
        }
    }

    pub fn has_stored_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// The key to use: environment first, then the stored secret.
    pub fn resolve_api_key(&self) -> Result<Option<String>, SecretStoreError> {
        if let Some(key) = api_key_from(|name| std::env::var(name).ok()) {
            return Ok(Some(key));
        }
        self.stored_api_key()
    }

    /// Build a client for these settings.
    pub fn client(&self, api_key: impl Into<String>) -> GeminiClient {
        GeminiClient::new(api_key)
            .with_endpoint(self.endpoint.clone())
            .with_model(self.model.clone())
    }
}

/// First non-blank value among [`API_KEY_ENV_VARS`] according to `lookup`.
pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// UI-only preferences that the GUI needs to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub theme: ThemePreference,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub show_technical_log: bool,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            theme: ThemePreference::Dark,
            locale: Locale::default(),
            show_technical_log: false,
        }
    }
}

/// Theme preference options.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

/// Where exported images land when no explicit path is given.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPreferences {
    #[serde(default)]
    pub directory: Option<String>,
}

impl ExportPreferences {
    /// Configured directory with `~` and environment variables expanded.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        let raw = self.directory.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        let expanded = shellexpand::full(raw)
            .map(|cow| cow.into_owned())
            .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
        Some(PathBuf::from(expanded))
    }
}

/// Path to the configuration directory.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`.
pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the configuration from the default location.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

/// Load the configuration from `path`, falling back to defaults on any problem.
pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings, secrets_migrated) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    if secrets_migrated {
                        if let Err(err) = save_config_to(&cfg, path) {
                            warnings
                                .push(format!("Failed to persist secure secret updates: {}", err));
                        }
                    }
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        CONFIG_FILE_NAME, err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    CONFIG_FILE_NAME, err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

/// Persist the configuration to the default location.
pub fn save_config(config: &FileConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_path())
}

/// Persist the configuration; plaintext keys are moved into the secret store first.
pub fn save_config_to(config: &FileConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut config_to_write = config.clone();
    config_to_write.gemini.migrate_api_key_secret()?;
    let serialized = toml::to_string_pretty(&config_to_write)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn sanitize_config(mut config: FileConfig) -> (FileConfig, Vec<String>, bool) {
    let mut warnings = Vec::new();

    if config.schema_version != CURRENT_SCHEMA_VERSION {
        warnings.push(format!(
            "Unknown config schema version {}. Resetting to {}.",
            config.schema_version, CURRENT_SCHEMA_VERSION
        ));
        return (FileConfig::default(), warnings, false);
    }

    if config.gemini.model.trim().is_empty() {
        warnings.push(format!("Empty Gemini model. Using '{}'.", DEFAULT_MODEL));
        config.gemini.model = DEFAULT_MODEL.to_string();
    } else {
        config.gemini.model = config.gemini.model.trim().to_string();
    }

    let endpoint = config.gemini.endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        warnings.push(format!("Empty Gemini endpoint. Using '{}'.", DEFAULT_ENDPOINT));
        config.gemini.endpoint = DEFAULT_ENDPOINT.to_string();
    } else if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        warnings.push(format!(
            "Gemini endpoint '{}' is not an http(s) URL. Using '{}'.",
            endpoint, DEFAULT_ENDPOINT
        ));
        config.gemini.endpoint = DEFAULT_ENDPOINT.to_string();
    } else {
        config.gemini.endpoint = endpoint.to_string();
    }

    let secrets_migrated = match config.gemini.migrate_api_key_secret() {
        Ok(migrated) => migrated,
        Err(err) => {
            warnings.push(format!(
                "Failed to move the plaintext API key into secure storage: {}",
                err
            ));
            false
        }
    };

    (config, warnings, secrets_migrated)
}
