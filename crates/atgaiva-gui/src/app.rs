//! Main application structure for the Atgaiva GUI

use std::path::PathBuf;
use std::time::{Duration, Instant};

use atgaiva_core::{
    ComparisonView, DeviceClass, ExportError, ExportOutcome, ImagePayload, Locale, PointerHub,
    SessionState, SourceFile, Transition, UploadSurface, export_result,
};

use crate::async_bridge::{AsyncBridge, RestoreUpdate};
use crate::dialogs::{self, SaveDialogSink};
use crate::processor;
use crate::state::AppState;
use crate::textures::SessionTextures;
use crate::ui_state::{LogLevel, Theme, UiState};
use crate::widgets;
use crate::widgets::result_actions::ResultAction;

/// Main application struct implementing eframe::App
pub struct AtgaivaApp {
    /// Domain state
    state: AppState,

    /// UI state
    ui_state: UiState,

    /// Async runtime bridge
    async_bridge: AsyncBridge,

    /// Previews of the current photos
    textures: SessionTextures,

    /// Window-level pointer events
    pointer_hub: PointerHub,

    /// Mounted while a result is on screen
    comparison: Option<ComparisonView>,

    /// Last config save time
    last_save: Instant,

    /// Config dirty flag
    config_dirty: bool,
}

impl AtgaivaApp {
    /// Create a new AtgaivaApp
    pub fn new(_cc: &eframe::CreationContext<'_>) -> std::io::Result<Self> {
        Ok(Self::with_state(AppState::new(), AsyncBridge::new()?))
    }

    pub fn with_state(state: AppState, async_bridge: AsyncBridge) -> Self {
        let ui_state = UiState::new(
            Theme::from(state.config.ui.theme),
            state.config.ui.show_technical_log,
        );

        let mut app = Self {
            state,
            ui_state,
            async_bridge,
            textures: SessionTextures::default(),
            pointer_hub: PointerHub::new(),
            comparison: None,
            last_save: Instant::now(),
            config_dirty: false,
        };

        app.ui_state.log(LogLevel::Info, "Application started");
        for warning in std::mem::take(&mut app.state.load_warnings) {
            app.ui_state.log(LogLevel::Warning, warning);
        }
        if let Some(path) = atgaiva_core::current_log_path() {
            app.ui_state
                .log(LogLevel::Info, format!("Logging to {}", path.display()));
        }

        app
    }

    /// Apply theme to egui context
    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.ui_state.theme {
            Theme::Dark => egui::Visuals::dark(),
            Theme::Light => egui::Visuals::light(),
        };
        ctx.set_visuals(visuals);
    }

    /// Auto-save configuration if dirty and enough time has passed
    fn handle_auto_save(&mut self) {
        if self.config_dirty && self.last_save.elapsed() > Duration::from_millis(300) {
            if let Err(e) = self.state.save_config() {
                self.ui_state
                    .log(LogLevel::Error, format!("Failed to save config: {}", e));
            }
            self.config_dirty = false;
            self.last_save = Instant::now();
        }
    }

    /// Mark configuration as dirty
    fn mark_dirty(&mut self) {
        self.config_dirty = true;
    }

    /// Session changed in a way that affects what is displayed.
    fn session_changed(&mut self) {
        self.textures.invalidate();
        if self.state.controller.state().restored().is_none() {
            self.comparison = None;
        } else if self.comparison.is_none() {
            self.comparison = Some(ComparisonView::mount(&self.pointer_hub));
        }
    }

    /// Feed files through the upload surface; only the first one counts.
    fn accept_files(&mut self, files: Vec<SourceFile>) {
        let mut selected = None;
        let accepted = UploadSurface::new(|payload: ImagePayload| selected = Some(payload)).drop_files(files);

        match selected {
            Some(payload) if accepted => {
                self.ui_state.log(
                    LogLevel::Info,
                    format!("Loaded {} image", payload.media_type()),
                );
                self.state.last_export = None;
                self.state.controller.select_image(payload);
                self.session_changed();
            }
            _ => self
                .ui_state
                .log(LogLevel::Warning, "Ignored a file that is not an image"),
        }
    }

    fn browse_for_photo(&mut self) {
        let Some(path) = dialogs::pick_photo(self.state.messages().dropzone_title) else {
            return;
        };
        match SourceFile::from_path(&path) {
            Ok(file) => self.accept_files(vec![file]),
            Err(e) => self.ui_state.log(LogLevel::Error, e.to_string()),
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let (hovered, dropped) = ctx.input(|i| {
            (
                !i.raw.hovered_files.is_empty(),
                i.raw.dropped_files.clone(),
            )
        });
        // Drops only count while the upload area is visible.
        let accepting = matches!(self.state.controller.state(), SessionState::NoImage);
        self.ui_state.files_hovered = hovered && accepting;
        if dropped.is_empty() || !accepting {
            return;
        }

        match widgets::dropzone::first_dropped(&dropped) {
            Some(Ok(file)) => self.accept_files(vec![file]),
            Some(Err(e)) => self.ui_state.log(LogLevel::Error, e.to_string()),
            None => {}
        }
    }

    /// Start a restoration
    fn start_restore(&mut self, ctx: &egui::Context) {
        let Some(job) = self.state.prepare_restore() else {
            if let Some(message) = self.state.controller.state().error() {
                self.ui_state.log(LogLevel::Error, message.to_string());
            }
            return;
        };

        let request = job.request;
        let repaint_ctx = ctx.clone();
        match processor::start_restore(&self.async_bridge, job, move || repaint_ctx.request_repaint()) {
            Ok(()) => self.ui_state.log(
                LogLevel::Info,
                format!(
                    "Restoration #{} started with model {}",
                    request.get(),
                    self.state.config.gemini.model
                ),
            ),
            Err(e) => {
                self.ui_state
                    .log(LogLevel::Error, format!("Failed to start restoration: {}", e));
                self.state.abandon_restore(request, e);
                self.session_changed();
            }
        }
    }

    /// Handle results from background tasks
    fn handle_restore_update(&mut self, update: RestoreUpdate) {
        let request = update.request.get();
        let elapsed = update.elapsed_ms / 1000.0;
        let failure = update.result.as_ref().err().map(ToString::to_string);

        match self.state.controller.complete_restore(update.request, update.result) {
            Transition::Ignored => self.ui_state.log(
                LogLevel::Info,
                format!("Discarded result of superseded restoration #{request}"),
            ),
            Transition::Applied => {
                match failure {
                    Some(error) => self.ui_state.log(
                        LogLevel::Error,
                        format!("Restoration #{request} failed after {elapsed:.1}s: {error}"),
                    ),
                    None => self.ui_state.log(
                        LogLevel::Info,
                        format!("Restoration #{request} completed in {elapsed:.1}s"),
                    ),
                }
                self.session_changed();
            }
        }
    }

    fn download(&mut self) {
        let messages = self.state.messages();
        let Some(restored) = self.state.controller.state().restored() else {
            return;
        };

        let directory = self
            .state
            .config
            .export
            .resolved_directory()
            .or_else(dialogs::default_download_directory);
        let mut sink = SaveDialogSink::new(messages.download, directory);

        match export_result(restored, DeviceClass::current(), &mut sink) {
            Ok(ExportOutcome::Saved(path)) => {
                self.ui_state
                    .log(LogLevel::Info, format!("Saved {}", path.display()));
                self.state.last_export = Some(path);
            }
            Ok(ExportOutcome::Shared) => self.ui_state.log(LogLevel::Info, messages.share_title),
            Err(ExportError::Cancelled) => self.ui_state.log(LogLevel::Info, "Download cancelled"),
            Err(e) => {
                self.ui_state
                    .log(LogLevel::Error, format!("Download failed: {}", e));
                dialogs::alert(messages.app_title, messages.download_failed);
            }
        }
    }

    fn open_saved(&mut self, path: PathBuf) {
        if let Err(e) = open::that(&path) {
            self.ui_state
                .log(LogLevel::Error, format!("Failed to open {}: {}", path.display(), e));
        }
    }

    /// Render the top panel with title, locale and theme controls
    fn render_top_panel(&mut self, ctx: &egui::Context) {
        let messages = self.state.messages();
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(messages.app_title);
                ui.label(egui::RichText::new(messages.app_subtitle).weak());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.ui_state.theme {
                        Theme::Dark => "☀ Light",
                        Theme::Light => "🌙 Dark",
                    };
                    if ui.button(theme_label).clicked() {
                        self.ui_state.theme = self.ui_state.theme.toggled();
                        self.state.config.ui.theme = self.ui_state.theme.into();
                        self.mark_dirty();
                    }

                    let mut locale = self.state.locale();
                    egui::ComboBox::from_id_salt("locale")
                        .selected_text(locale_name(locale))
                        .show_ui(ui, |ui| {
                            for candidate in [Locale::Lithuanian, Locale::English] {
                                ui.selectable_value(&mut locale, candidate, locale_name(candidate));
                            }
                        });
                    if locale != self.state.locale() {
                        self.state.set_locale(locale);
                        self.mark_dirty();
                    }

                    let session = self.state.controller.state();
                    if !matches!(session, SessionState::NoImage) {
                        let reset = ui.add_enabled(
                            !session.is_restoring(),
                            egui::Button::new(messages.start_over),
                        );
                        if reset.clicked() {
                            self.state.controller.reset();
                            self.state.last_export = None;
                            self.ui_state.log(LogLevel::Info, "Session reset");
                            self.session_changed();
                        }
                    }
                });
            });
        });
    }

    /// Render the main UI content
    fn render_main_ui(&mut self, ui: &mut egui::Ui) {
        let ctx = ui.ctx().clone();
        let messages = self.state.messages();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if let Some(message) = self.state.controller.state().error().map(str::to_string) {
                    if widgets::error_banner::render(ui, &message) {
                        self.state.controller.dismiss_error();
                    }
                    ui.add_space(8.0);
                }

                match self.state.controller.state() {
                    SessionState::NoImage => {
                        if widgets::dropzone::render(ui, messages, self.ui_state.files_hovered) {
                            self.browse_for_photo();
                        }
                    }
                    SessionState::HasImage { .. } | SessionState::Failed { .. } => {
                        if let Some(texture) = self.textures.original.as_ref() {
                            widgets::preview(ui, texture, 420.0);
                            ui.add_space(12.0);
                        }
                        ui.group(|ui| {
                            ui.set_min_width(ui.available_width());
                            let response = widgets::restoration_options::render(ui, &mut self.state);
                            if response.changed {
                                self.mark_dirty();
                            }
                            if response.restore_clicked {
                                self.start_restore(&ctx);
                            }
                        });
                    }
                    SessionState::Restoring { .. } => {
                        widgets::progress_display::render(ui, self.textures.original.as_ref(), messages);
                    }
                    SessionState::Restored { .. } => {
                        match (
                            self.comparison.as_ref(),
                            self.textures.original.as_ref(),
                            self.textures.restored.as_ref(),
                        ) {
                            (Some(view), Some(before), Some(after)) => {
                                widgets::comparison::render(ui, view, before, after, messages);
                            }
                            _ => {
                                ui.label(messages.restored_label);
                            }
                        }
                        ui.add_space(12.0);

                        let last_export = self.state.last_export.clone();
                        match widgets::result_actions::render(ui, messages, last_export.as_deref()) {
                            Some(ResultAction::Download) => self.download(),
                            Some(ResultAction::ChangeSettings) => {
                                self.state.controller.discard_result();
                                self.state.last_export = None;
                                self.session_changed();
                            }
                            Some(ResultAction::OpenSaved) => {
                                if let Some(path) = last_export {
                                    self.open_saved(path);
                                }
                            }
                            None => {}
                        }
                    }
                }

                ui.add_space(16.0);
                ui.separator();

                ui.group(|ui| {
                    ui.set_min_width(ui.available_width());
                    if widgets::api_key_section::render(ui, &mut self.state, &mut self.ui_state) {
                        self.mark_dirty();
                    }
                });

                ui.add_space(8.0);

                // Technical log
                let log_response = egui::CollapsingHeader::new("Technical Log")
                    .default_open(self.ui_state.technical_log_expanded)
                    .show(ui, |ui| {
                        widgets::technical_log::render(ui, &mut self.ui_state);
                    });
                if log_response.header_response.clicked() {
                    self.ui_state.technical_log_expanded = !self.ui_state.technical_log_expanded;
                    self.state.config.ui.show_technical_log = self.ui_state.technical_log_expanded;
                    self.mark_dirty();
                }
            });
    }
}

fn locale_name(locale: Locale) -> &'static str {
    match locale {
        Locale::Lithuanian => "LT",
        Locale::English => "EN",
    }
}

impl eframe::App for AtgaivaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme
        self.apply_theme(ctx);

        // Poll for finished restorations - collect first to avoid borrow checker issues
        let mut updates = Vec::new();
        self.async_bridge.poll_updates(|update| updates.push(update));
        for update in updates {
            self.handle_restore_update(update);
        }

        // Window-level pointer tracking for the comparison divider
        if self.comparison.is_some() {
            let events = ctx.input(|i| widgets::comparison::pointer_events(&i.events));
            for event in &events {
                self.pointer_hub.dispatch(event);
            }
        }

        self.handle_dropped_files(ctx);

        for problem in self.textures.sync(ctx, self.state.controller.state()) {
            self.ui_state.log(LogLevel::Warning, problem);
        }

        // Top panel
        self.render_top_panel(ctx);

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_main_ui(ui);
        });

        // Auto-save
        self.handle_auto_save();
        if self.config_dirty {
            ctx.request_repaint_after(Duration::from_millis(350));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.config_dirty {
            let _ = self.state.save_config();
        }
    }
}
