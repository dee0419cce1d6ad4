//! Main application module for Quire
//!
//! Implements the eframe App trait: lays out the ribbon, chapter list, raw
//! stylesheet editor and style form, routes their actions into the session,
//! and drives the background work (typing debounce, chapter watcher, compile
//! worker) once per frame.

use crate::config::{Settings, WindowSize};
use crate::error::Error;
use crate::files::dialogs::{pick_compiler_executable, pick_project_folder};
use crate::state::AppState;
use crate::theme::ThemeManager;
use crate::ui::{
    show_compiler_check, show_compiler_prompt, show_error_modal, ChapterPanel,
    ChapterPanelAction, CompilerPromptResult, Ribbon, RibbonAction, RibbonState, SettingsPanel,
    StyleFormPanel, StylesheetEditor, DEFAULT_PANEL_WIDTH,
};
use eframe::egui;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const APP_NAME: &str = "Quire";

/// How often to wake up for the chapter watcher and a running compile.
const BACKGROUND_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Keyboard shortcut actions, detected before the editor sees the input.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// Ctrl+S
    Save,
    /// Ctrl+O
    OpenProject,
    /// Ctrl+Z
    Undo,
    /// Ctrl+Y or Ctrl+Shift+Z
    Redo,
    /// Ctrl+,
    OpenSettings,
}

/// The main application struct that holds all state and implements eframe::App.
pub struct QuireApp {
    state: AppState,
    theme_manager: ThemeManager,
    ribbon: Ribbon,
    settings_panel: SettingsPanel,
    chapter_panel: ChapterPanel,
    style_form: StyleFormPanel,
    editor: StylesheetEditor,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl QuireApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing {}", APP_NAME);

        let state = AppState::new();
        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply(&cc.egui_ctx);

        Self {
            state,
            theme_manager,
            ribbon: Ribbon::new(),
            settings_panel: SettingsPanel::new(),
            chapter_panel: ChapterPanel::new(),
            style_form: StyleFormPanel::new(),
            editor: StylesheetEditor::new(),
            last_window_size: None,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let (size, maximized) = ctx.input(|i| {
            (
                i.viewport().inner_rect.map(|rect| rect.size()),
                i.viewport().maximized.unwrap_or(false),
            )
        });
        let Some(size) = size else {
            return;
        };

        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if !changed {
            return;
        }
        self.last_window_size = Some(size);

        let window_size = if maximized {
            // Keep the restored size so un-maximizing next launch looks right.
            WindowSize {
                maximized,
                ..self.state.settings.window_size
            }
        } else {
            WindowSize {
                width: size.x,
                height: size.y,
                maximized,
            }
        };
        if window_size != self.state.settings.window_size {
            debug!(
                "Window state updated: {}x{}, maximized: {}",
                window_size.width, window_size.height, window_size.maximized
            );
            self.state.settings.window_size = window_size;
            self.state.mark_settings_dirty();
        }
    }

    /// "Project - Quire", or "Quire" with nothing open.
    fn window_title(&self) -> String {
        match self.state.session() {
            Some(session) => format!("{} - {}", session.name(), APP_NAME),
            None => APP_NAME.to_string(),
        }
    }

    fn report(&mut self, error: Error) {
        let time = self.get_app_time();
        self.state.handle_error(error, time);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;
        let font_size = self.state.settings.font_size;
        let now = Instant::now();

        let ribbon_state = RibbonState {
            has_project: self.state.has_project(),
            can_undo: self.state.session().map(|s| s.can_undo()).unwrap_or(false),
            can_redo: self.state.session().map(|s| s.can_redo()).unwrap_or(false),
            is_compiling: self.state.is_compiling(),
            is_dark,
        };

        let mut ribbon_action = None;
        egui::TopBottomPanel::top("ribbon")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ribbon_action = self.ribbon.show(ui, ribbon_state);
            });

        self.render_status_bar(ctx);

        let mut chapter_action = None;
        let mut apply_form = false;
        let mut typed: Option<String> = None;
        let mut open_request: Option<PathBuf> = None;

        if let Some(session) = self.state.session_mut() {
            egui::SidePanel::left("chapter_panel")
                .default_width(DEFAULT_PANEL_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    chapter_action = self.chapter_panel.show(ui, session);
                });

            egui::SidePanel::right("style_form")
                .default_width(320.0)
                .resizable(true)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .id_source("style_form_scroll")
                        .show(ui, |ui| {
                            apply_form = self.style_form.show(ui, session).apply_requested;
                        });
                });

            egui::CentralPanel::default().show(ctx, |ui| {
                typed = self.editor.show(ui, session, is_dark, font_size);
            });
        } else {
            let recent = self.state.settings.recent_projects.clone();
            egui::CentralPanel::default().show(ctx, |ui| {
                open_request = render_welcome(ui, &recent);
            });
        }

        if let Some(action) = ribbon_action {
            self.handle_ribbon_action(action, ctx);
        }
        if let Some(text) = typed {
            if let Some(Err(e)) = self.state.session_mut().map(|s| s.edit_text(text, now)) {
                self.report(e);
            }
        }
        if apply_form {
            if let Some(Err(e)) = self.state.session_mut().map(|s| s.apply_form()) {
                self.report(e);
            }
        }
        if let Some(action) = chapter_action {
            self.handle_chapter_action(action);
        }
        if let Some(path) = open_request {
            self.open_project(&path);
        }
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    match self.state.session() {
                        Some(session) => {
                            ui.label(
                                egui::RichText::new(session.layout().root().display().to_string())
                                    .small()
                                    .weak(),
                            );
                            if session.save_pending() {
                                ui.separator();
                                ui.label(egui::RichText::new("Save pending").small());
                            }
                        }
                        None => {
                            ui.label(egui::RichText::new("No project").small().weak());
                        }
                    }

                    if self.state.is_compiling() {
                        ui.separator();
                        ui.spinner();
                        let text = if self.state.is_cancelling() {
                            "Cancelling…"
                        } else {
                            "Compiling EPUB…"
                        };
                        ui.label(egui::RichText::new(text).small());
                    }

                    if let Some(message) = &self.state.ui.toast_message {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(egui::RichText::new(message.as_str()).small());
                        });
                    }
                });
            });
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;

        // Settings
        if self.state.ui.show_settings {
            let output = self
                .settings_panel
                .show(ctx, &mut self.state.settings, is_dark);

            if output.reset_requested {
                let recent = std::mem::take(&mut self.state.settings.recent_projects);
                self.state.settings = Settings {
                    recent_projects: recent,
                    ..Settings::default()
                };
                info!("Settings reset to defaults");
            }
            if output.changed || output.reset_requested {
                self.theme_manager.set_theme(self.state.settings.theme);
                self.state.mark_settings_dirty();
                self.state.apply_settings_to_session();
            }
            if output.check_compiler_requested {
                self.state.check_compiler();
            }
            if output.close_requested {
                self.state.ui.show_settings = false;
            }
        }

        // Manual compiler path
        let prompt_result = match self.state.ui.compiler_prompt.as_mut() {
            Some(prompt) => show_compiler_prompt(ctx, prompt, is_dark),
            None => CompilerPromptResult::None,
        };
        match prompt_result {
            CompilerPromptResult::None => {}
            CompilerPromptResult::Cancelled => self.state.ui.compiler_prompt = None,
            CompilerPromptResult::Browse => {
                let start = self
                    .state
                    .settings
                    .compiler_path
                    .as_deref()
                    .and_then(|p| Path::new(p).parent().map(Path::to_path_buf));
                if let Some(path) = pick_compiler_executable(start.as_deref()) {
                    if let Some(prompt) = self.state.ui.compiler_prompt.as_mut() {
                        prompt.input = path.display().to_string();
                    }
                }
            }
            CompilerPromptResult::Submit(input) => {
                if let Err(e) = self.state.submit_compiler_path(&input) {
                    self.report(e);
                }
            }
        }

        // Compiler check
        let close_check = self
            .state
            .ui
            .compiler_check
            .as_ref()
            .map(|check| show_compiler_check(ctx, check, is_dark))
            .unwrap_or(false);
        if close_check {
            self.state.ui.compiler_check = None;
        }

        // Error
        if self.state.ui.show_error_modal
            && show_error_modal(ctx, &self.state.ui.error_message, is_dark)
        {
            self.state.dismiss_error();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::{Key, Modifiers};

        let action = ctx.input_mut(|i| {
            // Ctrl+Shift+Z before Ctrl+Z, which would also match it.
            if i.consume_key(Modifiers::COMMAND | Modifiers::SHIFT, Key::Z) {
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Z) {
                return Some(KeyboardAction::Undo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Y) {
                return Some(KeyboardAction::Redo);
            }
            if i.consume_key(Modifiers::COMMAND, Key::S) {
                return Some(KeyboardAction::Save);
            }
            if i.consume_key(Modifiers::COMMAND, Key::O) {
                return Some(KeyboardAction::OpenProject);
            }
            if i.consume_key(Modifiers::COMMAND, Key::Comma) {
                return Some(KeyboardAction::OpenSettings);
            }
            None
        });

        if let Some(action) = action {
            debug!("Keyboard shortcut: {:?}", action);
            match action {
                KeyboardAction::Save => self.handle_save(),
                KeyboardAction::OpenProject => self.handle_open_project(),
                KeyboardAction::Undo => self.handle_undo(),
                KeyboardAction::Redo => self.handle_redo(),
                KeyboardAction::OpenSettings => self.state.toggle_settings(),
            }
        }
    }

    fn handle_ribbon_action(&mut self, action: RibbonAction, ctx: &egui::Context) {
        debug!("Ribbon action: {:?}", action);
        match action {
            RibbonAction::OpenProject => self.handle_open_project(),
            RibbonAction::ReloadChapters => {
                let time = self.get_app_time();
                match self.state.reload_chapters() {
                    Ok(()) => self.state.show_toast("Chapters reloaded", time, 2.0),
                    Err(e) => self.report(e),
                }
            }
            RibbonAction::Save => self.handle_save(),
            RibbonAction::Undo => self.handle_undo(),
            RibbonAction::Redo => self.handle_redo(),
            RibbonAction::OpenPreview => {
                if let Err(e) = self.state.open_preview() {
                    self.report(e);
                }
            }
            RibbonAction::Compile => {
                if let Err(e) = self.state.start_compile() {
                    self.report(e);
                }
            }
            RibbonAction::CancelCompile => self.state.cancel_compile(),
            RibbonAction::CheckCompiler => self.state.check_compiler(),
            RibbonAction::ToggleTheme => {
                let theme = self.theme_manager.toggle();
                self.theme_manager.apply(ctx);
                self.state.update_settings(|s| s.theme = theme);
            }
            RibbonAction::OpenSettings => self.state.toggle_settings(),
            RibbonAction::ToggleCollapse => self.ribbon.toggle_collapsed(),
        }
    }

    fn handle_chapter_action(&mut self, action: ChapterPanelAction) {
        let time = self.get_app_time();
        let Some(session) = self.state.session_mut() else {
            return;
        };
        match action {
            ChapterPanelAction::SelectPreview(chapter) => session.set_preview_chapter(chapter),
            ChapterPanelAction::SetCentering(chapter, flags) => {
                session.set_chapter_centering(chapter, flags)
            }
            ChapterPanelAction::CenterBook(flags) => match session.quick_center_global(flags) {
                Ok(true) => self.state.show_toast("Centering rules added", time, 2.0),
                Ok(false) => {}
                Err(e) => self.report(e),
            },
        }
    }

    fn handle_open_project(&mut self) {
        let start = self.state.settings.picker_start_dir();
        match pick_project_folder(start.as_deref()) {
            Some(path) => self.open_project(&path),
            None => debug!("Project picker cancelled"),
        }
    }

    fn open_project(&mut self, path: &Path) {
        let time = self.get_app_time();
        match self.state.open_project(path) {
            Ok(()) => {
                self.editor.reset();
                self.style_form = StyleFormPanel::new();
                self.chapter_panel = ChapterPanel::new();
                if let Some(session) = self.state.session() {
                    let message = format!("Opened {}", session.name());
                    self.state.show_toast(message, time, 2.5);
                }
            }
            Err(e) => self.report(e),
        }
    }

    fn handle_save(&mut self) {
        let time = self.get_app_time();
        let outcome = self.state.session_mut().map(|session| {
            session.flush_typing();
            session.save()
        });
        match outcome {
            Some(Ok(true)) => self.state.show_toast("Stylesheet saved", time, 1.5),
            Some(Ok(false)) => self.report(Error::StylesheetBusy),
            Some(Err(e)) => self.report(e),
            None => {}
        }
    }

    fn handle_undo(&mut self) {
        let time = self.get_app_time();
        match self.state.session_mut().map(|s| s.undo()) {
            Some(Ok(true)) => debug!("Undo performed"),
            Some(Ok(false)) => self.state.show_toast("Nothing to undo", time, 1.5),
            Some(Err(e)) => self.report(e),
            None => {}
        }
    }

    fn handle_redo(&mut self) {
        let time = self.get_app_time();
        match self.state.session_mut().map(|s| s.redo()) {
            Some(Ok(true)) => debug!("Redo performed"),
            Some(Ok(false)) => self.state.show_toast("Nothing to redo", time, 1.5),
            Some(Err(e)) => self.report(e),
            None => {}
        }
    }

    /// Open a folder dropped onto the window as a project.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(folder) = dropped.into_iter().find(|p| p.is_dir()) {
            info!("Folder dropped: {}", folder.display());
            self.open_project(&folder);
        }
    }

    /// Wake up again when background work needs polling.
    fn schedule_repaint(&self, ctx: &egui::Context) {
        let Some(session) = self.state.session() else {
            return;
        };
        let mut after = BACKGROUND_POLL_INTERVAL;
        if let Some(remaining) = session.typing_remaining(Instant::now()) {
            after = after.min(remaining + Duration::from_millis(10));
        }
        if self.state.is_compiling() {
            after = after.min(Duration::from_millis(100));
        }
        ctx.request_repaint_after(after);
    }
}

/// Start screen without a project. Returns a recent project to open.
fn render_welcome(ui: &mut egui::Ui, recent: &[PathBuf]) -> Option<PathBuf> {
    let mut open = None;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.heading(APP_NAME);
        ui.add_space(8.0);
        ui.label("Open a book project folder (Ctrl+O) or drop one onto this window.");
        ui.label(
            egui::RichText::new("A project has a Chapters folder with Markdown files.")
                .small()
                .weak(),
        );

        if !recent.is_empty() {
            ui.add_space(24.0);
            ui.label(egui::RichText::new("Recent projects").strong());
            ui.add_space(4.0);
            for path in recent {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                if ui
                    .link(name)
                    .on_hover_text(path.display().to_string())
                    .clicked()
                {
                    open = Some(path.clone());
                }
            }
        }
    });
    open
}

impl eframe::App for QuireApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.theme_manager.apply_if_needed(ctx);

        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));
        self.update_window_state(ctx);
        self.handle_dropped_files(ctx);

        // Background work
        self.state.tick(Instant::now());
        self.state.poll_compile(current_time);
        self.state.refresh_preview_if_dirty();

        // Shortcuts first so the text editor does not also receive them.
        self.handle_keyboard_shortcuts(ctx);

        self.render_ui(ctx);
        self.render_dialogs(ctx);

        self.schedule_repaint(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_settings_if_dirty();
    }

    fn auto_save_interval(&self) -> Duration {
        Duration::from_secs(30)
    }
}
