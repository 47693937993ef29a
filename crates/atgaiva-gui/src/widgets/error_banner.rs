//! Dismissible error banner

/// Render the banner. Returns true when the user dismissed it.
pub fn render(ui: &mut egui::Ui, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::new()
        .fill(egui::Color32::from_rgb(127, 29, 29))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(239, 68, 68)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::from_rgb(254, 202, 202), "⚠");
                ui.add(
                    egui::Label::new(egui::RichText::new(message).color(egui::Color32::WHITE))
                        .wrap(),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    dismissed
}
