//! Technical log widget

use crate::ui_state::{LogLevel, MAX_LOG_ENTRIES, UiState};

/// Render technical log
pub fn render(ui: &mut egui::Ui, ui_state: &mut UiState) {
    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.label("Entries:");
            ui.label(format!("{} / {}", ui_state.technical_log.len(), MAX_LOG_ENTRIES));

            if ui.button("Clear").clicked() {
                ui_state.technical_log.clear();
            }

            if let Some(path) = atgaiva_core::current_log_path() {
                if ui.small_button("Open log file").clicked() {
                    let _ = open::that(path);
                }
            }
        });

        ui.separator();

        egui::ScrollArea::vertical()
            .max_height(240.0)
            .auto_shrink([false, true])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for entry in &ui_state.technical_log {
                    ui.horizontal(|ui| {
                        ui.label(&entry.timestamp);

                        let (color, prefix) = match entry.level {
                            LogLevel::Info => (egui::Color32::GRAY, "INFO"),
                            LogLevel::Warning => (egui::Color32::YELLOW, "WARN"),
                            LogLevel::Error => (egui::Color32::RED, "ERROR"),
                        };

                        ui.colored_label(color, prefix);
                        ui.label(&entry.message);
                    });
                }
            });
    });
}
