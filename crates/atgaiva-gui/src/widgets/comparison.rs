//! Before/after comparison with a draggable divider

use atgaiva_core::{ComparisonView, ContainerBounds, Messages, PointerEvent};

use super::fit_size;

const HANDLE_RADIUS: f32 = 16.0;

/// Translate this frame's raw input into window-level pointer events.
///
/// Presses are handled by the widget itself; only moves and releases are global.
pub fn pointer_events(events: &[egui::Event]) -> Vec<PointerEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::PointerMoved(pos) => Some(PointerEvent::MouseMove { client_x: pos.x }),
            egui::Event::PointerButton { pressed: false, .. } => Some(PointerEvent::MouseUp),
            egui::Event::Touch { phase, pos, .. } => match phase {
                egui::TouchPhase::Move => Some(PointerEvent::TouchMove {
                    touches: vec![pos.x],
                }),
                egui::TouchPhase::End | egui::TouchPhase::Cancel => Some(PointerEvent::TouchEnd),
                egui::TouchPhase::Start => None,
            },
            _ => None,
        })
        .collect()
}

/// Render the comparison of `before` (left of the divider) and `after`
pub fn render(
    ui: &mut egui::Ui,
    view: &ComparisonView,
    before: &egui::TextureHandle,
    after: &egui::TextureHandle,
    messages: &Messages,
) {
    let size = fit_size(after.size_vec2(), ui.available_width(), 600.0);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());

    view.set_bounds(ContainerBounds::new(rect.left(), rect.width()));
    let split_x = view.divider_x();
    if response.hover_pos().is_some_and(|pos| on_divider(rect, split_x, pos)) || view.is_dragging() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    }

    let pressed_at = ui.input(|i| {
        if i.pointer.any_pressed() {
            i.pointer.press_origin()
        } else {
            None
        }
    });
    if pressed_at.is_some_and(|pos| on_divider(rect, split_x, pos)) {
        view.grab_divider();
    }

    let painter = ui.painter_at(rect);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(after.id(), rect, uv, egui::Color32::WHITE);

    let hidden = rect.width() * view.before_clip_right() / 100.0;
    let before_rect = egui::Rect::from_min_max(rect.min, egui::pos2(rect.right() - hidden, rect.bottom()));
    painter
        .with_clip_rect(before_rect)
        .image(before.id(), rect, uv, egui::Color32::WHITE);

    painter.vline(split_x, rect.y_range(), egui::Stroke::new(3.0, egui::Color32::WHITE));
    let handle = egui::pos2(split_x, rect.center().y);
    painter.circle(
        handle,
        HANDLE_RADIUS,
        egui::Color32::WHITE,
        egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
    );
    painter.text(
        handle,
        egui::Align2::CENTER_CENTER,
        "↔",
        egui::FontId::proportional(16.0),
        egui::Color32::from_gray(60),
    );

    label(&painter, rect.left_top() + egui::vec2(12.0, 12.0), egui::Align2::LEFT_TOP, messages.original_label);
    label(&painter, rect.right_top() + egui::vec2(-12.0, 12.0), egui::Align2::RIGHT_TOP, messages.restored_label);

    if view.is_dragging() {
        ui.ctx().request_repaint();
    }
}

/// Presses only grab the divider line or its knob, not the rest of the image.
fn on_divider(rect: egui::Rect, split_x: f32, pos: egui::Pos2) -> bool {
    rect.y_range().contains(pos.y) && (pos.x - split_x).abs() <= HANDLE_RADIUS
}

fn label(painter: &egui::Painter, pos: egui::Pos2, anchor: egui::Align2, text: &str) {
    let galley = painter.layout_no_wrap(
        text.to_string(),
        egui::FontId::proportional(13.0),
        egui::Color32::WHITE,
    );
    let text_rect = anchor.anchor_size(pos, galley.size());
    painter.rect_filled(text_rect.expand2(egui::vec2(8.0, 4.0)), 6.0, egui::Color32::from_black_alpha(150));
    painter.galley(text_rect.min, galley, egui::Color32::WHITE);
}
