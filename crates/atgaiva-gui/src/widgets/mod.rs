//! UI widgets for the Atgaiva GUI

pub mod api_key_section;
pub mod comparison;
pub mod dropzone;
pub mod error_banner;
pub mod progress_display;
pub mod restoration_options;
pub mod result_actions;
pub mod technical_log;

/// Largest size with the aspect ratio of `source` that fits the given box.
pub fn fit_size(source: egui::Vec2, max_width: f32, max_height: f32) -> egui::Vec2 {
    if source.x <= 0.0 || source.y <= 0.0 || max_width <= 0.0 || max_height <= 0.0 {
        return egui::vec2(max_width.max(0.0), max_height.max(0.0));
    }
    let scale = (max_width / source.x).min(max_height / source.y);
    source * scale
}

/// Show a texture scaled to the available width.
pub fn preview(ui: &mut egui::Ui, texture: &egui::TextureHandle, max_height: f32) {
    let size = fit_size(texture.size_vec2(), ui.available_width(), max_height);
    ui.vertical_centered(|ui| {
        ui.add(egui::Image::new((texture.id(), size)).corner_radius(8.0));
    });
}
