//! Restoration options widget

use atgaiva_core::RestorationOption;

use crate::state::AppState;

/// What the user did in the options panel this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptionsResponse {
    pub changed: bool,
    pub restore_clicked: bool,
}

/// Render the option checkboxes and the restore button
pub fn render(ui: &mut egui::Ui, state: &mut AppState) -> OptionsResponse {
    let messages = state.messages();
    let mut response = OptionsResponse::default();

    ui.vertical(|ui| {
        ui.heading(messages.settings_heading);
        ui.add_space(8.0);

        let options = state.controller.options();
        for option in RestorationOption::ALL {
            let mut enabled = options.is_enabled(option);
            if ui
                .checkbox(&mut enabled, messages.option_label(option))
                .on_hover_text(option.task())
                .changed()
            {
                state.controller.toggle_option(option);
                response.changed = true;
            }
        }

        ui.add_space(16.0);

        let can_restore = state.controller.state().can_restore();
        let button = egui::Button::new(egui::RichText::new(messages.restore_button).size(20.0))
            .fill(egui::Color32::from_rgb(37, 99, 235))
            .min_size(egui::vec2(ui.available_width(), 48.0));
        if ui.add_enabled(can_restore, button).clicked() {
            response.restore_clicked = true;
        }
    });

    response
}
