//! API key management widget

use crate::state::{ApiKeyStatus, AppState};
use crate::ui_state::{LogLevel, UiState};

/// Render API key section
/// Returns true if the stored key changed and the config must be saved
pub fn render(ui: &mut egui::Ui, state: &mut AppState, ui_state: &mut UiState) -> bool {
    let mut changed = false;

    ui.vertical(|ui| {
        ui.heading("Gemini API");

        match state.api_key_status() {
            ApiKeyStatus::Environment => {
                ui.colored_label(
                    egui::Color32::GREEN,
                    "✓ Using the API key from GEMINI_API_KEY",
                );
            }
            ApiKeyStatus::Stored => {
                ui.colored_label(egui::Color32::GREEN, "✓ API Key is saved");

                if ui.button("Clear API Key").clicked() {
                    match state.config.gemini.clear_api_key() {
                        Ok(()) => {
                            ui_state.log(LogLevel::Info, "Stored API key cleared");
                            changed = true;
                        }
                        Err(e) => ui_state.log(LogLevel::Error, format!("Error clearing API key: {e}")),
                    }
                }
            }
            ApiKeyStatus::Missing => {
                ui.colored_label(egui::Color32::YELLOW, "⚠ No API Key saved");
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label("API Key:");
                    ui.add(egui::TextEdit::singleline(&mut ui_state.api_key_input).password(true));

                    if ui.button("Save").clicked() && !ui_state.api_key_input.trim().is_empty() {
                        let input = std::mem::take(&mut ui_state.api_key_input);
                        match state.config.gemini.set_api_key(&input) {
                            Ok(()) => {
                                ui_state.log(LogLevel::Info, "API key saved securely");
                                changed = true;
                            }
                            Err(e) => {
                                ui_state.log(LogLevel::Error, format!("Error saving API key: {e}"));
                            }
                        }
                    }
                });
            }
        }

        ui.label(
            egui::RichText::new(format!("Model: {}", state.config.gemini.model))
                .small()
                .weak(),
        );
    });

    changed
}
