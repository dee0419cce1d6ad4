//! Ribbon UI Component for Quire
//!
//! Icon-based toolbar with the project, edit, output and app groups.

use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the ribbon in expanded state.
const RIBBON_HEIGHT_EXPANDED: f32 = 40.0;

/// Height of the ribbon in collapsed state.
const RIBBON_HEIGHT_COLLAPSED: f32 = 28.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the ribbon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RibbonAction {
    // Project
    /// Pick a project folder (Ctrl+O)
    OpenProject,
    /// Re-read the chapter list from disk
    ReloadChapters,
    /// Write the stylesheet now (Ctrl+S)
    Save,

    // Edit
    Undo,
    Redo,

    // Output
    /// Write the preview page and open it in the browser
    OpenPreview,
    /// Build the EPUB
    Compile,
    /// Stop a running compile
    CancelCompile,
    /// Report whether Pandoc can be found
    CheckCompiler,

    // App
    ToggleTheme,
    OpenSettings,

    /// Toggle ribbon collapsed state
    ToggleCollapse,
}

/// What the ribbon needs to know to enable its buttons.
#[derive(Debug, Clone, Copy, Default)]
pub struct RibbonState {
    pub has_project: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_compiling: bool,
    pub is_dark: bool,
}

/// Ribbon UI state and rendering.
#[derive(Debug, Clone, Default)]
pub struct Ribbon {
    /// Whether the ribbon is in collapsed mode (no group labels).
    collapsed: bool,
}

impl Ribbon {
    pub fn new() -> Self {
        Self { collapsed: false }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Get the current ribbon height.
    pub fn height(&self) -> f32 {
        if self.collapsed {
            RIBBON_HEIGHT_COLLAPSED
        } else {
            RIBBON_HEIGHT_EXPANDED
        }
    }

    /// Render the ribbon and return any triggered action.
    pub fn show(&mut self, ui: &mut Ui, state: RibbonState) -> Option<RibbonAction> {
        let mut action: Option<RibbonAction> = None;
        let is_dark = state.is_dark;

        let ribbon_bg = if is_dark {
            Color32::from_rgb(40, 40, 40)
        } else {
            Color32::from_rgb(248, 248, 248)
        };
        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };
        let label_color = if is_dark {
            Color32::from_rgb(140, 140, 140)
        } else {
            Color32::from_rgb(120, 120, 120)
        };

        ui.painter()
            .rect_filled(ui.available_rect_before_wrap(), 0.0, ribbon_bg);

        ui.horizontal(|ui| {
            ui.set_height(self.height());
            ui.spacing_mut().item_spacing.x = 2.0;

            let collapse_icon = if self.collapsed { "▶" } else { "◀" };
            let collapse_tooltip = if self.collapsed {
                "Expand ribbon"
            } else {
                "Collapse ribbon"
            };
            if icon_button(ui, collapse_icon, collapse_tooltip, true, is_dark).clicked() {
                action = Some(RibbonAction::ToggleCollapse);
            }

            let separator = |ui: &mut Ui, height: f32| {
                ui.add_space(4.0);
                vertical_separator(ui, separator_color, height - 8.0);
                ui.add_space(4.0);
            };
            let group_label = |ui: &mut Ui, collapsed: bool, text: &str| {
                if !collapsed {
                    ui.label(RichText::new(text).size(10.0).color(label_color));
                }
            };

            separator(ui, self.height());

            // ═══════════════════════════════════════════════════════════════════
            // Project Group
            // ═══════════════════════════════════════════════════════════════════
            group_label(ui, self.collapsed, "Project");

            if icon_button(ui, "📂", "Open Project (Ctrl+O)", true, is_dark).clicked() {
                action = Some(RibbonAction::OpenProject);
            }
            if icon_button(ui, "🔄", "Reload Chapters", state.has_project, is_dark).clicked() {
                action = Some(RibbonAction::ReloadChapters);
            }
            if icon_button(ui, "💾", "Save Stylesheet (Ctrl+S)", state.has_project, is_dark)
                .clicked()
            {
                action = Some(RibbonAction::Save);
            }

            separator(ui, self.height());

            // ═══════════════════════════════════════════════════════════════════
            // Edit Group
            // ═══════════════════════════════════════════════════════════════════
            group_label(ui, self.collapsed, "Edit");

            if icon_button(ui, "↩", "Undo (Ctrl+Z)", state.can_undo, is_dark).clicked() {
                action = Some(RibbonAction::Undo);
            }
            if icon_button(ui, "↪", "Redo (Ctrl+Y)", state.can_redo, is_dark).clicked() {
                action = Some(RibbonAction::Redo);
            }

            separator(ui, self.height());

            // ═══════════════════════════════════════════════════════════════════
            // Output Group
            // ═══════════════════════════════════════════════════════════════════
            group_label(ui, self.collapsed, "Output");

            if icon_button(ui, "🌐", "Open Preview in Browser", state.has_project, is_dark)
                .clicked()
            {
                action = Some(RibbonAction::OpenPreview);
            }

            if state.is_compiling {
                if icon_button(ui, "⏹", "Cancel Compile", true, is_dark).clicked() {
                    action = Some(RibbonAction::CancelCompile);
                }
                ui.spinner();
            } else if icon_button(ui, "📖", "Compile EPUB", state.has_project, is_dark).clicked()
            {
                action = Some(RibbonAction::Compile);
            }

            if icon_button(ui, "🔍", "Check Pandoc Installation", true, is_dark).clicked() {
                action = Some(RibbonAction::CheckCompiler);
            }

            // ═══════════════════════════════════════════════════════════════════
            // App Group (right-aligned)
            // ═══════════════════════════════════════════════════════════════════
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if icon_button(ui, "⚙", "Settings (Ctrl+,)", true, is_dark).clicked() {
                    action = Some(RibbonAction::OpenSettings);
                }
                let theme_icon = if is_dark { "☀" } else { "🌙" };
                if icon_button(ui, theme_icon, "Toggle Theme", true, is_dark).clicked() {
                    action = Some(RibbonAction::ToggleTheme);
                }
            });
        });

        action
    }
}

/// Render an icon button with hover highlight.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    // The gear renders above the emoji baseline.
    let y_offset = match icon {
        "⚙" => 2.0,
        _ => 0.0,
    };
    let icon_pos = egui::pos2(btn.rect.center().x, btn.rect.center().y + y_offset);

    ui.painter().text(
        icon_pos,
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ribbon_toggle_collapsed() {
        let mut ribbon = Ribbon::new();
        assert!(!ribbon.is_collapsed());

        ribbon.toggle_collapsed();
        assert!(ribbon.is_collapsed());

        ribbon.toggle_collapsed();
        assert!(!ribbon.is_collapsed());
    }

    #[test]
    fn test_ribbon_height() {
        let mut ribbon = Ribbon::default();
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_EXPANDED);
        ribbon.toggle_collapsed();
        assert_eq!(ribbon.height(), RIBBON_HEIGHT_COLLAPSED);
    }

    #[test]
    fn test_ribbon_state_default_disables_project_actions() {
        let state = RibbonState::default();
        assert!(!state.has_project);
        assert!(!state.can_undo);
        assert!(!state.is_compiling);
    }

    #[test]
    fn test_ribbon_action_equality() {
        assert_eq!(RibbonAction::Compile, RibbonAction::Compile);
        assert_ne!(RibbonAction::Compile, RibbonAction::CancelCompile);
    }
}
