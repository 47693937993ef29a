//! UI-specific state (ephemeral)

use std::collections::VecDeque;

use atgaiva_core::ThemePreference;
use chrono::Local;

/// Entries kept in the technical log before the oldest are dropped.
pub const MAX_LOG_ENTRIES: usize = 200;

/// UI-specific state that doesn't need to be persisted
#[derive(Clone)]
pub struct UiState {
    /// Current theme (dark/light)
    pub theme: Theme,

    /// Technical log visibility
    pub technical_log_expanded: bool,

    /// Technical log entries (max 200)
    pub technical_log: VecDeque<LogEntry>,

    /// API key input buffer for direct entry
    pub api_key_input: String,

    /// Files are being dragged over the window
    pub files_hovered: bool,
}

impl UiState {
    pub fn new(theme: Theme, technical_log_expanded: bool) -> Self {
        Self {
            theme,
            technical_log_expanded,
            technical_log: VecDeque::with_capacity(MAX_LOG_ENTRIES),
            api_key_input: String::new(),
            files_hovered: false,
        }
    }

    /// Add a log entry, maintaining max 200 entries
    pub fn add_log_entry(&mut self, entry: LogEntry) {
        if self.technical_log.len() >= MAX_LOG_ENTRIES {
            self.technical_log.pop_front();
        }
        self.technical_log.push_back(entry);
    }

    /// Stamp and record a message.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.add_log_entry(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(Theme::Dark, false)
    }
}

/// Theme selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl From<ThemePreference> for Theme {
    fn from(value: ThemePreference) -> Self {
        match value {
            ThemePreference::Dark => Theme::Dark,
            ThemePreference::Light => Theme::Light,
        }
    }
}

impl From<Theme> for ThemePreference {
    fn from(value: Theme) -> Self {
        match value {
            Theme::Dark => ThemePreference::Dark,
            Theme::Light => ThemePreference::Light,
        }
    }
}

/// Technical log entry
#[derive(Clone, Debug)]
pub struct LogEntry {
    /// Timestamp
    pub timestamp: String,

    /// Log level
    pub level: LogLevel,

    /// Message
    pub message: String,
}

/// Log level for coloring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_capped() {
        let mut state = UiState::default();
        for i in 0..(MAX_LOG_ENTRIES + 25) {
            state.log(LogLevel::Info, format!("entry {i}"));
        }
        assert_eq!(state.technical_log.len(), MAX_LOG_ENTRIES);
        assert_eq!(state.technical_log.front().unwrap().message, "entry 25");
    }

    #[test]
    fn theme_round_trips_through_preference() {
        for theme in [Theme::Dark, Theme::Light] {
            assert_eq!(Theme::from(ThemePreference::from(theme)), theme);
        }
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
