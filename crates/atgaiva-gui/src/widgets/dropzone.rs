//! Upload area: click to browse, or drop a file onto the window

use atgaiva_core::{Messages, SourceFile, UploadError};

/// Render the dropzone.
/// Returns true when the user clicked it to open the file picker.
pub fn render(ui: &mut egui::Ui, messages: &Messages, files_hovered: bool) -> bool {
    let desired = egui::vec2(ui.available_width(), 280.0);
    let (rect, response) = ui.allocate_exact_size(desired, egui::Sense::click());
    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

    let highlight = files_hovered || response.hovered();
    let visuals = ui.visuals();
    let (fill, stroke_color) = if highlight {
        (
            visuals.selection.bg_fill.gamma_multiply(0.15),
            visuals.selection.stroke.color,
        )
    } else {
        (
            visuals.extreme_bg_color,
            visuals.widgets.noninteractive.bg_stroke.color,
        )
    };
    let text_color = visuals.text_color();
    let weak_color = visuals.weak_text_color();

    let painter = ui.painter_at(rect);
    painter.rect(
        rect.shrink(1.0),
        16.0,
        fill,
        egui::Stroke::new(2.0, stroke_color),
        egui::StrokeKind::Inside,
    );

    let center = rect.center();
    painter.text(
        center - egui::vec2(0.0, 48.0),
        egui::Align2::CENTER_CENTER,
        "🖼",
        egui::FontId::proportional(48.0),
        stroke_color,
    );
    painter.text(
        center + egui::vec2(0.0, 12.0),
        egui::Align2::CENTER_CENTER,
        messages.dropzone_title,
        egui::FontId::proportional(22.0),
        text_color,
    );
    painter.text(
        center + egui::vec2(0.0, 44.0),
        egui::Align2::CENTER_CENTER,
        messages.dropzone_hint,
        egui::FontId::proportional(14.0),
        weak_color,
    );

    response.clicked()
}

/// Read the first dropped file. Later files are ignored even when the first one fails.
pub fn first_dropped(files: &[egui::DroppedFile]) -> Option<Result<SourceFile, UploadError>> {
    let file = files.first()?;
    if let Some(path) = file.path.as_deref() {
        return Some(SourceFile::from_path(path));
    }
    let bytes = file.bytes.as_ref()?;
    Some(Ok(SourceFile::from_memory(
        file.name.clone(),
        &file.mime,
        bytes.to_vec(),
    )))
}
