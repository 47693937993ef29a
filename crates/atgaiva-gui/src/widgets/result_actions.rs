//! Buttons under the comparison view

use std::path::Path;

use atgaiva_core::Messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultAction {
    Download,
    ChangeSettings,
    OpenSaved,
}

/// Render the result buttons
pub fn render(ui: &mut egui::Ui, messages: &Messages, last_export: Option<&Path>) -> Option<ResultAction> {
    let mut action = None;

    ui.vertical(|ui| {
        ui.colored_label(egui::Color32::from_rgb(34, 197, 94), messages.restored);
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let download = egui::Button::new(egui::RichText::new(format!("⬇ {}", messages.download)).size(18.0))
                .fill(egui::Color32::from_rgb(22, 163, 74))
                .min_size(egui::vec2(220.0, 44.0));
            if ui.add(download).clicked() {
                action = Some(ResultAction::Download);
            }

            let change = egui::Button::new(egui::RichText::new(messages.change_settings).size(18.0))
                .min_size(egui::vec2(180.0, 44.0));
            if ui.add(change).clicked() {
                action = Some(ResultAction::ChangeSettings);
            }
        });

        if let Some(path) = last_export {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(path.display().to_string()).weak());
                if ui.small_button("📂").on_hover_text("Open").clicked() {
                    action = Some(ResultAction::OpenSaved);
                }
            });
        }
    });

    action
}
