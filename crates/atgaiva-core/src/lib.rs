//! Core library crate exposing shared Atgaiva photo restoration logic.

pub mod comparison;
pub mod config;
pub mod export;
pub mod gemini;
pub mod logging;
pub mod messages;
pub mod options;
pub mod payload;
pub mod secret_store;
pub mod session;
pub mod upload;

pub use comparison::{
    ComparisonSlider, ComparisonView, ContainerBounds, INITIAL_POSITION, PointerEvent, PointerHub,
    PointerSubscription,
};
pub use config::{
    API_KEY_ENV_VARS, ConfigError, ConfigLoadResult, ConfigSource, ExportPreferences, FileConfig,
    GeminiPreferences, SecretValue, ThemePreference, UiPreferences, api_key_from,
    config_directory, config_path, load_config, load_config_from, save_config, save_config_to,
};
pub use export::{
    DeviceClass, DirectorySink, ExportArtifact, ExportError, ExportOutcome, ExportSink, FileSink,
    RESULT_FILE_NAME, export_result,
};
pub use gemini::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient, ImageRestorer, RestoreError};
pub use logging::{LoggingDestination, LoggingError, current_log_path, init_logging};
pub use messages::{Locale, Messages};
pub use options::{RestorationOption, RestorationOptions, build_instruction};
pub use payload::{ImagePayload, PayloadError};
pub use session::{
    RequestId, RestorationController, RestoreJob, SessionEvent, SessionState, Transition,
};
pub use upload::{ACCEPTED_EXTENSIONS, ACCEPTED_MEDIA_TYPES, SourceFile, UploadError, UploadSurface};
