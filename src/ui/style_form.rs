//! Visual style form
//!
//! Edits font family, font size, colour, background and alignment of one
//! selector. Field edits stay in the form until "Apply", which writes them
//! into the stylesheet as a single undo step.

use crate::css::Scope;
use crate::editor::form::{hex_to_rgb, rgb_to_hex};
use crate::editor::StyleTarget;
use crate::session::Session;
use eframe::egui::{self, RichText, Ui};

/// Values offered for `text-align`; empty removes the property.
const TEXT_ALIGN_OPTIONS: [&str; 5] = ["", "left", "center", "right", "justify"];

/// Result of showing the style form.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleFormOutput {
    pub apply_requested: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StyleFormPanel {
    /// Text of the custom selector box
    custom_selector: String,
}

impl StyleFormPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, ui: &mut Ui, session: &mut Session) -> StyleFormOutput {
        let mut output = StyleFormOutput::default();

        let current_target = session.form_target().clone();
        let current_scope = session.form_scope();
        let mut new_target: Option<StyleTarget> = None;
        let mut new_scope: Option<Scope> = None;

        ui.heading("Style");
        ui.add_space(4.0);

        // ─────────────────────────────────────────────────────────────────────
        // Selector
        // ─────────────────────────────────────────────────────────────────────
        egui::Grid::new("style_form_selector")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Element");
                let is_custom = matches!(current_target, StyleTarget::Custom(_));
                let selected_text = if is_custom {
                    "Custom selector"
                } else {
                    current_target.label()
                };
                egui::ComboBox::from_id_source("style_form_target")
                    .selected_text(selected_text)
                    .width(180.0)
                    .show_ui(ui, |ui| {
                        for target in StyleTarget::FIXED.iter() {
                            if ui
                                .selectable_label(*target == current_target, target.label())
                                .clicked()
                            {
                                new_target = Some(target.clone());
                            }
                        }
                        ui.separator();
                        if ui.selectable_label(is_custom, "Custom selector").clicked() {
                            new_target = Some(StyleTarget::Custom(
                                self.custom_selector.trim().to_string(),
                            ));
                        }
                    });
                ui.end_row();

                if is_custom {
                    ui.label("Selector");
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.custom_selector)
                            .hint_text(".book-content .note")
                            .desired_width(180.0)
                            .font(egui::TextStyle::Monospace),
                    );
                    if response.lost_focus() {
                        let selector = self.custom_selector.trim().to_string();
                        if current_target != StyleTarget::Custom(selector.clone()) {
                            new_target = Some(StyleTarget::Custom(selector));
                        }
                    }
                    ui.end_row();
                }

                ui.label("Applies to");
                let scope_label = |scope: Scope| match scope {
                    Scope::Global => "Whole book".to_string(),
                    Scope::Chapter(index) => session
                        .chapters()
                        .get(index)
                        .map(|c| format!("{}. {}", index + 1, c.name))
                        .unwrap_or_else(|| format!("Chapter {}", index + 1)),
                };
                egui::ComboBox::from_id_source("style_form_scope")
                    .selected_text(scope_label(current_scope))
                    .width(180.0)
                    .show_ui(ui, |ui| {
                        if ui
                            .selectable_label(current_scope.is_global(), "Whole book")
                            .clicked()
                        {
                            new_scope = Some(Scope::Global);
                        }
                        for index in 0..session.chapters().len() {
                            let scope = Scope::Chapter(index);
                            if ui
                                .selectable_label(current_scope == scope, scope_label(scope))
                                .clicked()
                            {
                                new_scope = Some(scope);
                            }
                        }
                    });
                ui.end_row();
            });

        if new_target.is_some() || new_scope.is_some() {
            session.select_form_target(
                new_target.unwrap_or(current_target),
                new_scope.unwrap_or(current_scope),
            );
        }

        let target = session.form_target().clone();
        let selector = target.selector(session.root_class(), session.form_scope());
        ui.label(RichText::new(selector).monospace().weak());
        ui.add_space(6.0);

        // ─────────────────────────────────────────────────────────────────────
        // Fields
        // ─────────────────────────────────────────────────────────────────────
        let supports_align = target.supports_text_align();
        let fields = session.form_fields_mut();

        egui::Grid::new("style_form_fields")
            .num_columns(2)
            .spacing([8.0, 6.0])
            .show(ui, |ui| {
                ui.label("Font family");
                ui.add(
                    egui::TextEdit::singleline(&mut fields.font_family)
                        .hint_text("Georgia, serif")
                        .desired_width(180.0),
                );
                ui.end_row();

                ui.label("Font size");
                ui.add(
                    egui::TextEdit::singleline(&mut fields.font_size)
                        .hint_text("1em")
                        .desired_width(180.0),
                );
                ui.end_row();

                ui.label("Color");
                ui.horizontal(|ui| {
                    let mut rgb = hex_to_rgb(fields.color_picker_value()).unwrap_or([0, 0, 0]);
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        fields.color = rgb_to_hex(rgb);
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut fields.color)
                            .hint_text("#333333")
                            .desired_width(148.0),
                    );
                });
                ui.end_row();

                ui.label("Background");
                ui.horizontal(|ui| {
                    let mut rgb =
                        hex_to_rgb(fields.background_picker_value()).unwrap_or([255, 255, 255]);
                    if ui.color_edit_button_srgb(&mut rgb).changed() {
                        fields.background_color = rgb_to_hex(rgb);
                    }
                    ui.add(
                        egui::TextEdit::singleline(&mut fields.background_color)
                            .hint_text("#ffffff")
                            .desired_width(148.0),
                    );
                });
                ui.end_row();

                ui.label("Alignment");
                ui.add_enabled_ui(supports_align, |ui| {
                    let shown = if fields.text_align.is_empty() {
                        "(not set)"
                    } else {
                        fields.text_align.as_str()
                    };
                    egui::ComboBox::from_id_source("style_form_align")
                        .selected_text(shown.to_string())
                        .width(180.0)
                        .show_ui(ui, |ui| {
                            for option in TEXT_ALIGN_OPTIONS {
                                let label = if option.is_empty() { "(not set)" } else { option };
                                if ui
                                    .selectable_label(fields.text_align == option, label)
                                    .clicked()
                                {
                                    fields.text_align = option.to_string();
                                }
                            }
                        });
                })
                .response
                .on_disabled_hover_text("Inline elements ignore text alignment");
                ui.end_row();
            });

        let writable = target.is_writable();
        if !writable {
            ui.add_space(4.0);
            ui.label(
                RichText::new("Selector must not be empty or contain { } ; or comments")
                    .small()
                    .weak(),
            );
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(writable, egui::Button::new("Apply"))
                .on_hover_text("Write these values into the stylesheet")
                .on_disabled_hover_text("Enter a usable selector first")
                .clicked()
            {
                output.apply_requested = true;
            }
            if ui
                .button("Revert")
                .on_hover_text("Reload the values from the stylesheet")
                .clicked()
            {
                session.reload_form();
            }
        });

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_align_options_start_with_unset() {
        assert_eq!(TEXT_ALIGN_OPTIONS[0], "");
        assert!(TEXT_ALIGN_OPTIONS.contains(&"center"));
    }

    #[test]
    fn test_output_default() {
        assert!(!StyleFormOutput::default().apply_requested);
    }
}
