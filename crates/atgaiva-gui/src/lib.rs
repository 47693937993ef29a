//! Atgaiva GUI module using eframe/egui
//!
//! Upload an old photo, pick restoration options and compare the result side by side.

pub mod app;
pub mod async_bridge;
pub mod dialogs;
pub mod processor;
pub mod state;
pub mod textures;
pub mod ui_state;
pub mod widgets;

use anyhow::anyhow;
use atgaiva_core::{LoggingDestination, init_logging};

/// Main entry point for the GUI
pub fn run() -> anyhow::Result<()> {
    if let Err(e) = init_logging(LoggingDestination::FileOnly) {
        eprintln!("Logging disabled: {e}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([480.0, 600.0])
            .with_resizable(true)
            .with_drag_and_drop(true)
            .with_title("RetroAtgaiva"),
        ..Default::default()
    };

    eframe::run_native(
        "Atgaiva",
        native_options,
        Box::new(|cc| Ok(Box::new(app::AtgaivaApp::new(cc)?))),
    )
    .map_err(|e| anyhow!("{e}"))
}
