//! Chapter list side panel
//!
//! Lists the project's chapters. Selecting one restricts the preview to it;
//! the centering checkboxes below apply to the selected chapter only and
//! never touch the stylesheet. "Center whole book" writes the same rules
//! for the root into the stylesheet instead.

use crate::css::CenteringFlags;
use crate::session::Session;
use eframe::egui::{self, RichText, Ui};

/// Default width of the chapter panel.
pub const DEFAULT_PANEL_WIDTH: f32 = 220.0;

/// Actions that can be triggered from the chapter panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChapterPanelAction {
    /// Preview one chapter (`None` = all)
    SelectPreview(Option<usize>),
    /// Preview-only centering for a chapter
    SetCentering(usize, CenteringFlags),
    /// Append centering rules for the whole book to the stylesheet
    CenterBook(CenteringFlags),
}

#[derive(Debug, Clone, Default)]
pub struct ChapterPanel {
    /// Flags staged for "Center whole book"
    book_flags: CenteringFlags,
}

impl ChapterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut Ui, session: &Session) -> Option<ChapterPanelAction> {
        let mut action = None;
        let selected = session.preview_chapter();

        ui.add_space(4.0);
        ui.label(RichText::new(session.name()).strong().size(15.0));
        ui.label(
            RichText::new(format!("{} chapter(s)", session.chapters().len()))
                .small()
                .weak(),
        );
        ui.separator();

        egui::ScrollArea::vertical()
            .id_source("chapter_list")
            .max_height(ui.available_height() * 0.55)
            .show(ui, |ui| {
                if ui
                    .selectable_label(selected.is_none(), "📚 All chapters")
                    .clicked()
                {
                    action = Some(ChapterPanelAction::SelectPreview(None));
                }
                for (index, chapter) in session.chapters().iter().enumerate() {
                    let label = format!("{}. {}", index + 1, chapter.name);
                    if ui
                        .selectable_label(selected == Some(index), label)
                        .on_hover_text(chapter.path.display().to_string())
                        .clicked()
                    {
                        action = Some(ChapterPanelAction::SelectPreview(Some(index)));
                    }
                }
            });

        ui.separator();

        // ─────────────────────────────────────────────────────────────────────
        // Chapter centering (preview only)
        // ─────────────────────────────────────────────────────────────────────
        ui.label(RichText::new("Center in chapter").strong());
        match selected {
            Some(index) => {
                let mut flags = session.chapter_centering(index);
                if centering_checkboxes(ui, &mut flags) {
                    action = Some(ChapterPanelAction::SetCentering(index, flags));
                }
                ui.label(
                    RichText::new("Preview only, not saved to the stylesheet")
                        .small()
                        .weak(),
                );
            }
            None => {
                ui.label(
                    RichText::new("Select a chapter to center its content")
                        .small()
                        .weak(),
                );
            }
        }

        ui.separator();

        // ─────────────────────────────────────────────────────────────────────
        // Whole book (written to the stylesheet)
        // ─────────────────────────────────────────────────────────────────────
        ui.label(RichText::new("Center whole book").strong());
        centering_checkboxes(ui, &mut self.book_flags);
        if ui
            .add_enabled(self.book_flags.any(), egui::Button::new("Add to stylesheet"))
            .on_hover_text("Append centering rules for the whole book")
            .clicked()
        {
            action = Some(ChapterPanelAction::CenterBook(self.book_flags));
            self.book_flags = CenteringFlags::default();
        }

        action
    }
}

/// Returns `true` if any box was toggled.
fn centering_checkboxes(ui: &mut Ui, flags: &mut CenteringFlags) -> bool {
    let mut changed = false;
    changed |= ui.checkbox(&mut flags.headings, "Headings").changed();
    changed |= ui.checkbox(&mut flags.paragraphs, "Paragraphs").changed();
    changed |= ui.checkbox(&mut flags.images, "Images").changed();
    changed |= ui.checkbox(&mut flags.blockquotes, "Blockquotes").changed();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_panel_has_no_staged_flags() {
        let panel = ChapterPanel::new();
        assert!(!panel.book_flags.any());
    }
}
