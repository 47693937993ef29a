//! Progress display widget

use atgaiva_core::Messages;

use super::fit_size;

/// Render the dimmed original with a spinner on top
pub fn render(ui: &mut egui::Ui, original: Option<&egui::TextureHandle>, messages: &Messages) {
    let Some(texture) = original else {
        ui.vertical_centered(|ui| {
            ui.spinner();
            ui.label(messages.restoring);
        });
        return;
    };

    let size = fit_size(texture.size_vec2(), ui.available_width(), 520.0);
    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    let painter = ui.painter_at(rect);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(texture.id(), rect, uv, egui::Color32::from_white_alpha(90));
    painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(120));

    let spinner_rect = egui::Rect::from_center_size(rect.center() - egui::vec2(0.0, 24.0), egui::vec2(40.0, 40.0));
    ui.put(spinner_rect, egui::Spinner::new().size(40.0));

    painter.text(
        rect.center() + egui::vec2(0.0, 20.0),
        egui::Align2::CENTER_CENTER,
        messages.restoring,
        egui::FontId::proportional(20.0),
        egui::Color32::WHITE,
    );
    painter.text(
        rect.center() + egui::vec2(0.0, 46.0),
        egui::Align2::CENTER_CENTER,
        messages.restoring_hint,
        egui::FontId::proportional(13.0),
        egui::Color32::LIGHT_GRAY,
    );
}
