//! Application state management for the Atgaiva GUI

use std::path::PathBuf;

use atgaiva_core::config::api_key_from;
use atgaiva_core::{
    FileConfig, GeminiClient, Locale, Messages, RequestId, RestorationController, RestoreError,
    RestoreJob, Transition,
};
use tracing::warn;

/// Where the API key for the next request will come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyStatus {
    Environment,
    Stored,
    Missing,
}

/// Main application state (domain/persistent)
pub struct AppState {
    /// Configuration from atgaiva-core
    pub config: FileConfig,

    /// Session controller for the current photo
    pub controller: RestorationController<GeminiClient>,

    /// Where the last download was written
    pub last_export: Option<PathBuf>,

    /// Problems reported while loading config.toml
    pub load_warnings: Vec<String>,
}

impl AppState {
    pub fn new() -> Self {
        let load = atgaiva_core::load_config();
        Self::from_config(load.config, load.warnings)
    }

    pub fn from_config(config: FileConfig, load_warnings: Vec<String>) -> Self {
        // The real key is resolved right before each request.
        let controller = RestorationController::new(config.gemini.client(String::new()))
            .with_options(config.restoration)
            .with_locale(config.ui.locale);

        Self {
            config,
            controller,
            last_export: None,
            load_warnings,
        }
    }

    pub fn locale(&self) -> Locale {
        self.config.ui.locale
    }

    pub fn messages(&self) -> &'static Messages {
        self.locale().messages()
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.config.ui.locale = locale;
        self.controller.set_locale(locale);
    }

    /// Save configuration to disk
    pub fn save_config(&mut self) -> Result<(), String> {
        self.config.restoration = self.controller.options();
        atgaiva_core::save_config(&self.config).map_err(|e| e.to_string())
    }

    pub fn api_key_status(&self) -> ApiKeyStatus {
        if api_key_from(|name| std::env::var(name).ok()).is_some() {
            ApiKeyStatus::Environment
        } else if self.config.gemini.has_stored_api_key() {
            ApiKeyStatus::Stored
        } else {
            ApiKeyStatus::Missing
        }
    }

    /// Start a restoration with a freshly resolved API key.
    ///
    /// Without a usable key the request fails immediately through the session,
    /// so the error banner explains what is missing.
    pub fn prepare_restore(&mut self) -> Option<RestoreJob<GeminiClient>> {
        if !self.controller.state().can_restore() {
            return None;
        }

        let api_key = match self.config.gemini.resolve_api_key() {
            Ok(key) => key,
            Err(err) => {
                warn!(error = %err, "Stored API key could not be read");
                None
            }
        };

        self.start_with_key(api_key)
    }

    /// The job for `request` never ran. The session fails but keeps its image.
    pub fn abandon_restore(&mut self, request: RequestId, reason: impl Into<String>) -> Transition {
        self.controller
            .complete_restore(request, Err(RestoreError::Unavailable(reason.into())))
    }

    fn start_with_key(&mut self, api_key: Option<String>) -> Option<RestoreJob<GeminiClient>> {
        match api_key {
            Some(key) => {
                self.controller.set_restorer(self.config.gemini.client(key));
                self.controller.begin_restore()
            }
            None => {
                if let Some(job) = self.controller.begin_restore() {
                    self.controller
                        .complete_restore(job.request, Err(RestoreError::MissingApiKey));
                }
                None
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
