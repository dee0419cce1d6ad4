//! UI components for Quire

mod chapter_panel;
mod dialogs;
mod ribbon;
mod settings;
mod style_form;
mod stylesheet_editor;

pub use chapter_panel::{ChapterPanel, ChapterPanelAction, DEFAULT_PANEL_WIDTH};
pub use dialogs::{show_compiler_check, show_compiler_prompt, show_error_modal, CompilerPromptResult};
pub use ribbon::{Ribbon, RibbonAction, RibbonState};
pub use settings::SettingsPanel;
pub use style_form::StyleFormPanel;
pub use stylesheet_editor::StylesheetEditor;
