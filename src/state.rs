//! Application state management for Quire
//!
//! `AppState` is what the window owns between frames: user settings, UI
//! flags (dialogs, toast, error modal), the open project session and the
//! compile running in the background, if any.

use crate::compile::{probe_compiler, resolve_compiler, CompileHandle};
use crate::config::{load_config, save_config_silent, Settings};
use crate::error::{Error, Result};
use crate::preview;
use crate::session::Session;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// How long shutdown waits for a cancelled compile to restore the stylesheet.
const SHUTDOWN_COMPILE_WAIT: Duration = Duration::from_secs(5);

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Manual compiler path entry, shown after a compile could not find Pandoc.
#[derive(Debug, Clone, Default)]
pub struct CompilerPrompt {
    pub input: String,
    /// Why the prompt is shown
    pub message: String,
}

/// Result of an explicit compiler check.
#[derive(Debug, Clone)]
pub struct CompilerCheck {
    /// Program name or path that was looked up
    pub program: String,
    /// Resolved location, `None` when not installed
    pub found: Option<PathBuf>,
}

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
    pub compiler_prompt: Option<CompilerPrompt>,
    pub compiler_check: Option<CompilerCheck>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state.
pub struct AppState {
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
    session: Option<Session>,
    compile: Option<CompileHandle>,
}

impl AppState {
    /// Create an AppState with settings loaded from the config file.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Theme: {:?}, root class: .{}",
            settings.theme, settings.root_class
        );
        Self::with_settings(settings)
    }

    /// Create AppState with custom settings (useful for testing).
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ui: UiState::default(),
            settings_dirty: false,
            session: None,
            compile: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Project
    // ─────────────────────────────────────────────────────────────────────────

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    pub fn has_project(&self) -> bool {
        self.session.is_some()
    }

    /// Load the project at `root`, replacing the current one.
    ///
    /// On failure the current project stays open.
    pub fn open_project(&mut self, root: &Path) -> Result<()> {
        if self.is_compiling() {
            return Err(Error::Application(
                "Wait for the running compile to finish before opening another project"
                    .to_string(),
            ));
        }

        let session = Session::open(root, &self.settings)?;
        info!(
            "Opened project '{}' with {} chapter(s)",
            session.name(),
            session.chapters().len()
        );
        self.session = Some(session);
        self.settings.add_recent_project(root.to_path_buf());
        self.settings_dirty = true;

        if self.settings.open_preview_after_load {
            if let Err(e) = self.open_preview() {
                warn!("Preview could not be opened: {}", e);
                self.show_error(format!("The preview could not be opened:\n{}", e));
            }
        }
        Ok(())
    }

    pub fn reload_chapters(&mut self) -> Result<()> {
        let session = self.session.as_mut().ok_or(Error::NoProject)?;
        session.reload_chapters()
    }

    /// Write the preview and open it in the browser.
    pub fn open_preview(&mut self) -> Result<PathBuf> {
        let refresh = self.settings.preview_refresh();
        let session = self.session.as_mut().ok_or(Error::NoProject)?;
        let path = session.write_preview(refresh)?;
        preview::open_in_browser(&path)?;
        Ok(path)
    }

    /// Rewrite an already opened preview after the stylesheet, chapter
    /// selection or centering changed.
    pub fn refresh_preview_if_dirty(&mut self) {
        let refresh = self.settings.preview_refresh();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.preview_path().is_none() || !session.is_preview_dirty() {
            return;
        }
        if let Err(e) = session.write_preview(refresh) {
            warn!("Failed to refresh preview: {}", e);
        }
    }

    /// Watcher events and typing idle time, once per frame.
    pub fn tick(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.tick(now);
        if let Err(e) = session.poll_chapter_changes() {
            warn!("Chapter reload failed: {}", e);
            self.show_error(format!("Chapters could not be reloaded:\n{}", e));
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compile
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_compiling(&self) -> bool {
        self.compile.is_some()
    }

    pub fn is_cancelling(&self) -> bool {
        self.compile
            .as_ref()
            .map(CompileHandle::is_cancelling)
            .unwrap_or(false)
    }

    /// Start compiling the open project in the background.
    pub fn start_compile(&mut self) -> Result<()> {
        if self.is_compiling() {
            debug!("Compile already running");
            return Ok(());
        }
        let session = self.session.as_mut().ok_or(Error::NoProject)?;
        let job = session.compile_job(&self.settings);
        info!(
            "Compiling '{}' with {}",
            session.name(),
            job.request.program
        );
        self.compile = Some(CompileHandle::spawn(job));
        Ok(())
    }

    pub fn cancel_compile(&mut self) {
        if let Some(handle) = &self.compile {
            info!("Cancelling compile");
            handle.cancel();
        }
    }

    /// Collect the compile outcome if the worker is done.
    ///
    /// Returns `true` when a compile finished this call.
    pub fn poll_compile(&mut self, current_time: f64) -> bool {
        let Some(outcome) = self.compile.as_ref().and_then(CompileHandle::poll) else {
            return false;
        };
        self.compile = None;

        match outcome {
            Ok(path) => {
                info!("EPUB written to {}", path.display());
                self.show_toast(
                    format!("EPUB written to {}", path.display()),
                    current_time,
                    4.0,
                );
            }
            Err(e) => self.handle_error(e, current_time),
        }

        // Saves refused while the compile held the stylesheet.
        let flushed = self
            .session
            .as_mut()
            .map(Session::flush_pending_save)
            .unwrap_or(Ok(false));
        if let Err(e) = flushed {
            self.handle_error(e, current_time);
        }
        true
    }

    /// Store a manually entered compiler path and compile again.
    pub fn submit_compiler_path(&mut self, input: &str) -> Result<()> {
        self.settings.set_compiler_path(input);
        self.settings_dirty = true;
        self.ui.compiler_prompt = None;
        info!(
            "Compiler path set to {:?}",
            self.settings.compiler_path.as_deref().unwrap_or("(automatic)")
        );
        self.start_compile()
    }

    /// Look the compiler up without running it.
    pub fn check_compiler(&mut self) {
        let program = resolve_compiler(self.settings.compiler_path.as_deref());
        let found = probe_compiler(&program);
        match &found {
            Some(path) => info!("Compiler found at {}", path.display()),
            None => info!("Compiler '{}' not found", program),
        }
        self.ui.compiler_check = Some(CompilerCheck { program, found });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────────────────────

    /// Route an operation error to the right surface.
    pub fn handle_error(&mut self, error: Error, current_time: f64) {
        match error {
            Error::CompilerNotFound { .. } => {
                warn!("{}", error);
                let input = self.settings.compiler_path.clone().unwrap_or_default();
                self.ui.compiler_prompt = Some(CompilerPrompt {
                    input,
                    message: error.to_string(),
                });
            }
            Error::CompilerCancelled => {
                self.show_toast("Compile cancelled", current_time, 2.5);
            }
            Error::StylesheetBusy => {
                self.show_toast("Stylesheet busy, will save after compile", current_time, 2.5);
            }
            Error::InvalidSelector { .. } => {
                self.show_toast(error.to_string(), current_time, 3.0);
            }
            other => {
                warn!("{}", other);
                self.show_error(other.to_string());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Push settings that affect the open project into its session.
    pub fn apply_settings_to_session(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.set_root_class(&self.settings.root_class);
            session.set_typing_window(self.settings.typing_debounce());
        }
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    pub fn save_settings(&mut self) -> bool {
        self.settings_dirty = true;
        self.save_settings_if_dirty()
    }

    /// Prepare state for application shutdown.
    ///
    /// A running compile is cancelled and given a moment to put the canonical
    /// stylesheet back on disk.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.compile.take() {
            handle.cancel();
            let deadline = Instant::now() + SHUTDOWN_COMPILE_WAIT;
            while Instant::now() < deadline {
                if handle.poll().is_some() {
                    break;
                }
                thread::sleep(Duration::from_millis(20));
            }
        }

        if let Some(session) = self.session.as_mut() {
            session.flush_typing();
            if let Err(e) = session.flush_pending_save() {
                warn!("Failed to save stylesheet during shutdown: {}", e);
            }
        }

        self.save_settings();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Clear an expired toast. Call this each frame.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings() -> Settings {
        Settings {
            open_preview_after_load: false,
            ..Settings::default()
        }
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("Chapters")).unwrap();
        fs::write(dir.path().join("Chapters/01.md"), "# One").unwrap();
        dir
    }

    fn wait_for_compile(state: &mut AppState) {
        for _ in 0..400 {
            if state.poll_compile(0.0) {
                return;
            }
            thread::sleep(Duration::from_millis(25));
        }
        panic!("compile did not finish");
    }

    #[test]
    fn test_appstate_with_settings() {
        let state = AppState::with_settings(settings());
        assert!(!state.has_project());
        assert!(!state.is_compiling());
        assert!(!state.settings_dirty);
    }

    #[test]
    fn test_open_project_adds_recent() {
        let dir = project();
        let mut state = AppState::with_settings(settings());
        state.open_project(dir.path()).unwrap();

        assert!(state.has_project());
        assert_eq!(state.settings.recent_projects[0], dir.path());
        assert!(state.settings_dirty);
        // Missing stylesheet starts from the default text.
        assert_eq!(
            state.session().unwrap().stylesheet(),
            crate::project::DEFAULT_STYLESHEET
        );
        assert!(dir.path().join("styles/epub-styles.css").is_file());
    }

    #[test]
    fn test_open_invalid_project_keeps_current() {
        let dir = project();
        let empty = TempDir::new().unwrap();
        let mut state = AppState::with_settings(settings());
        state.open_project(dir.path()).unwrap();

        assert!(matches!(
            state.open_project(empty.path()),
            Err(Error::ProjectInvalid { .. })
        ));
        assert_eq!(
            state.session().unwrap().layout().root(),
            dir.path()
        );
    }

    #[test]
    fn test_compile_without_project() {
        let mut state = AppState::with_settings(settings());
        assert!(matches!(state.start_compile(), Err(Error::NoProject)));
    }

    #[test]
    fn test_missing_compiler_opens_prompt() {
        let dir = project();
        let mut state = AppState::with_settings(Settings {
            compiler_path: Some("quire-no-such-compiler".to_string()),
            ..settings()
        });
        state.open_project(dir.path()).unwrap();
        state.start_compile().unwrap();
        assert!(state.is_compiling());
        wait_for_compile(&mut state);

        assert!(!state.is_compiling());
        let prompt = state.ui.compiler_prompt.as_ref().unwrap();
        assert_eq!(prompt.input, "quire-no-such-compiler");
        assert!(!state.ui.show_error_modal);

        // Stylesheet restored to canonical text.
        let css = fs::read_to_string(dir.path().join("styles/epub-styles.css")).unwrap();
        assert_eq!(css, state.session().unwrap().stylesheet());
    }

    #[test]
    fn test_submit_compiler_path_stores_and_retries() {
        let dir = project();
        let mut state = AppState::with_settings(settings());
        state.open_project(dir.path()).unwrap();
        state.ui.compiler_prompt = Some(CompilerPrompt::default());

        state
            .submit_compiler_path("\"quire-still-missing\"")
            .unwrap();
        assert_eq!(
            state.settings.compiler_path.as_deref(),
            Some("quire-still-missing")
        );
        assert!(state.ui.compiler_prompt.is_none());
        assert!(state.is_compiling());
        wait_for_compile(&mut state);
        assert!(state.ui.compiler_prompt.is_some());
    }

    #[test]
    fn test_check_missing_compiler() {
        let mut state = AppState::with_settings(Settings {
            compiler_path: Some("quire-no-such-compiler".to_string()),
            ..settings()
        });
        state.check_compiler();
        let check = state.ui.compiler_check.as_ref().unwrap();
        assert_eq!(check.program, "quire-no-such-compiler");
        assert!(check.found.is_none());
    }

    #[test]
    fn test_handle_error_routes() {
        let mut state = AppState::with_settings(settings());
        state.handle_error(Error::CompilerCancelled, 1.0);
        assert!(state.ui.toast_message.is_some());
        assert!(!state.ui.show_error_modal);

        state.handle_error(
            Error::InvalidSelector {
                selector: String::new(),
            },
            1.0,
        );
        assert_eq!(
            state.ui.toast_message.as_deref(),
            Some("Enter a selector before applying the style")
        );
        assert!(!state.ui.show_error_modal);

        state.handle_error(
            Error::CompilerFailed {
                status: Some(64),
                stderr: "pandoc: Unknown option".to_string(),
            },
            1.0,
        );
        assert!(state.ui.show_error_modal);
        assert!(state.ui.error_message.contains("Unknown option"));
    }

    #[test]
    fn test_update_settings_marks_dirty() {
        let mut state = AppState::with_settings(settings());
        state.update_settings(|s| s.font_size = 18.0);
        assert!(state.settings_dirty);
        assert_eq!(state.settings.font_size, 18.0);
    }

    #[test]
    fn test_apply_settings_to_session() {
        let dir = project();
        let mut state = AppState::with_settings(settings());
        state.open_project(dir.path()).unwrap();
        state.settings.root_class = "novel".to_string();
        state.apply_settings_to_session();
        assert_eq!(state.session().unwrap().root_class(), "novel");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_toast_expires() {
        let mut state = AppState::with_settings(settings());
        state.show_toast("Saved", 10.0, 2.0);
        state.update_toast(11.0);
        assert_eq!(state.ui.toast_message.as_deref(), Some("Saved"));
        state.update_toast(12.0);
        assert!(state.ui.toast_message.is_none());
    }

    #[test]
    fn test_error_modal() {
        let mut state = AppState::with_settings(settings());
        state.show_error("Boom");
        assert!(state.ui.show_error_modal);
        state.dismiss_error();
        assert!(!state.ui.show_error_modal);
        assert!(state.ui.error_message.is_empty());
    }

    #[test]
    fn test_toggle_settings() {
        let mut state = AppState::with_settings(settings());
        state.toggle_settings();
        assert!(state.ui.show_settings);
        state.toggle_settings();
        assert!(!state.ui.show_settings);
    }
}
