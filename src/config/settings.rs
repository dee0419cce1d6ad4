//! User settings for Quire
//!
//! Everything the user can change that outlives a session: appearance, the
//! book root class, compiler discovery, editing behaviour and recently opened
//! projects. Serialized as JSON; every field has a default so older or
//! hand-edited files still load.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Color scheme for the editor window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 820.0,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted user preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    /// Font size of the raw stylesheet editor
    pub font_size: f32,
    pub window_size: WindowSize,

    /// Class on the element that wraps the whole book in the preview
    pub root_class: String,

    /// Manually entered Pandoc path, used before any automatic lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compiler_path: Option<String>,
    /// Kill the compiler after this many seconds; `None` waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compile_timeout_secs: Option<u64>,

    /// Idle time before typed stylesheet text becomes an undo step
    pub typing_debounce_ms: u64,
    /// Number of undo steps kept
    pub history_capacity: usize,

    /// Browser auto refresh interval for the preview page (0 disables it)
    pub preview_refresh_secs: u32,
    /// Open the preview in the browser right after a project loads
    pub open_preview_after_load: bool,

    /// Most recent first
    pub recent_projects: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_size: 14.0,
            window_size: WindowSize::default(),
            root_class: Self::DEFAULT_ROOT_CLASS.to_string(),
            compiler_path: None,
            compile_timeout_secs: None,
            typing_debounce_ms: 500,
            history_capacity: 200,
            preview_refresh_secs: 2,
            open_preview_after_load: true,
            recent_projects: Vec::new(),
        }
    }
}

impl Settings {
    pub const DEFAULT_ROOT_CLASS: &'static str = "book-content";
    pub const MAX_RECENT_PROJECTS: usize = 10;

    pub const MIN_FONT_SIZE: f32 = 8.0;
    pub const MAX_FONT_SIZE: f32 = 32.0;
    pub const MIN_WINDOW_SIZE: f32 = 400.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    pub const MAX_DEBOUNCE_MS: u64 = 5000;
    pub const MIN_HISTORY_CAPACITY: usize = 10;
    pub const MAX_HISTORY_CAPACITY: usize = 5000;
    pub const MAX_REFRESH_SECS: u32 = 60;

    /// Move a project to the front of the recent list.
    pub fn add_recent_project(&mut self, path: PathBuf) {
        self.recent_projects.retain(|p| p != &path);
        self.recent_projects.insert(0, path);
        self.recent_projects.truncate(Self::MAX_RECENT_PROJECTS);
    }

    /// Folder the project picker starts in.
    pub fn picker_start_dir(&self) -> Option<PathBuf> {
        self.recent_projects
            .first()
            .and_then(|p| p.parent().map(|parent| parent.to_path_buf()))
    }

    pub fn typing_debounce(&self) -> Duration {
        Duration::from_millis(self.typing_debounce_ms)
    }

    pub fn compile_timeout(&self) -> Option<Duration> {
        self.compile_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn preview_refresh(&self) -> Option<u32> {
        Some(self.preview_refresh_secs).filter(|secs| *secs > 0)
    }

    /// Store a manually entered compiler path (quotes and blanks removed).
    pub fn set_compiler_path(&mut self, path: &str) {
        let cleaned = crate::compile::pandoc::clean_path(path);
        self.compiler_path = if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        };
    }

    /// Normalize a user-entered root class: trimmed, without a leading `.`.
    pub fn normalize_root_class(input: &str) -> String {
        input.trim().trim_start_matches('.').trim().to_string()
    }

    /// Clamp values to valid ranges after loading a possibly hand-edited file.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.root_class = Self::normalize_root_class(&self.root_class);
        if self.root_class.is_empty() || self.root_class.chars().any(char::is_whitespace) {
            self.root_class = Self::DEFAULT_ROOT_CLASS.to_string();
        }

        if let Some(path) = self.compiler_path.take() {
            self.set_compiler_path(&path);
        }

        self.typing_debounce_ms = self.typing_debounce_ms.min(Self::MAX_DEBOUNCE_MS);
        self.history_capacity = self
            .history_capacity
            .clamp(Self::MIN_HISTORY_CAPACITY, Self::MAX_HISTORY_CAPACITY);
        self.preview_refresh_secs = self.preview_refresh_secs.min(Self::MAX_REFRESH_SECS);

        let mut seen = Vec::new();
        self.recent_projects.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        self.recent_projects.truncate(Self::MAX_RECENT_PROJECTS);
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
