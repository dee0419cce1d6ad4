//! Raw stylesheet text editor
//!
//! A multiline `TextEdit` with CSS highlighting. The widget keeps its own
//! buffer and re-syncs from the session whenever the session replaced the
//! text (undo, redo, form apply); the session's text version is folded into
//! the widget id so egui drops the stale cursor state at the same time.

use crate::editor::CssHighlighter;
use crate::session::Session;
use eframe::egui::{self, Ui};

pub struct StylesheetEditor {
    highlighter: CssHighlighter,
    buffer: String,
    /// Session text version the buffer was last synced to
    synced_version: Option<u64>,
}

impl Default for StylesheetEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl StylesheetEditor {
    pub fn new() -> Self {
        Self {
            highlighter: CssHighlighter::new(),
            buffer: String::new(),
            synced_version: None,
        }
    }

    /// Forget the buffer, e.g. after another project was opened.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.synced_version = None;
    }

    /// Show the editor. Returns the new text if the user typed.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        session: &Session,
        dark_mode: bool,
        font_size: f32,
    ) -> Option<String> {
        let version = session.text_version();
        if self.synced_version != Some(version) {
            self.buffer = session.stylesheet().to_string();
            self.synced_version = Some(version);
        }

        let highlighter = &mut self.highlighter;
        let mut layouter = |ui: &Ui, text: &str, wrap_width: f32| {
            let mut job = highlighter.layout_job(text, dark_mode, font_size);
            job.wrap.max_width = wrap_width;
            ui.fonts(|fonts| fonts.layout_job(job))
        };

        let response = egui::ScrollArea::vertical()
            .id_source("stylesheet_editor_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add(
                    egui::TextEdit::multiline(&mut self.buffer)
                        .id(egui::Id::new("stylesheet_editor").with(version))
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(30)
                        .lock_focus(true)
                        .layouter(&mut layouter),
                )
            })
            .inner;

        if response.changed() {
            Some(self.buffer.clone())
        } else {
            None
        }
    }
}
