//! Modal dialogs
//!
//! - compiler path entry, shown when Pandoc could not be found
//! - compiler check result
//! - error message

use crate::state::{CompilerCheck, CompilerPrompt};
use eframe::egui::{self, Color32, Key, RichText};

/// Result from showing the compiler path dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum CompilerPromptResult {
    /// Dialog still open
    None,
    Cancelled,
    /// Open a file picker for the executable
    Browse,
    /// Save this path and compile again
    Submit(String),
}

fn dialog_frame(ctx: &egui::Context, is_dark: bool) -> egui::Frame {
    let bg_color = if is_dark {
        Color32::from_rgb(40, 40, 45)
    } else {
        Color32::from_rgb(250, 250, 250)
    };
    let border_color = if is_dark {
        Color32::from_rgb(70, 70, 80)
    } else {
        Color32::from_rgb(180, 180, 190)
    };
    egui::Frame::window(&ctx.style())
        .fill(bg_color)
        .stroke(egui::Stroke::new(1.0, border_color))
        .rounding(8.0)
}

/// Ask for the Pandoc executable location.
pub fn show_compiler_prompt(
    ctx: &egui::Context,
    prompt: &mut CompilerPrompt,
    is_dark: bool,
) -> CompilerPromptResult {
    let mut result = CompilerPromptResult::None;

    if ctx.input(|i| i.key_pressed(Key::Escape)) {
        return CompilerPromptResult::Cancelled;
    }

    egui::Window::new("🔧 Pandoc Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame(ctx, is_dark))
        .show(ctx, |ui| {
            ui.set_min_width(420.0);

            ui.add_space(8.0);
            ui.label(prompt.message.as_str());
            ui.add_space(8.0);
            ui.label("Enter the full path to the Pandoc executable:");
            ui.add_space(4.0);

            let response = ui.horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(&mut prompt.input)
                        .hint_text(if cfg!(windows) {
                            r"C:\Program Files\Pandoc\pandoc.exe"
                        } else {
                            "/usr/local/bin/pandoc"
                        })
                        .desired_width(330.0),
                );
                if ui.button("Browse…").clicked() {
                    result = CompilerPromptResult::Browse;
                }
                response
            });
            let response = response.inner;

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let submit_enabled = !prompt.input.trim().is_empty();
                    if ui
                        .add_enabled(submit_enabled, egui::Button::new("Save and Compile"))
                        .clicked()
                        || (response.lost_focus()
                            && ctx.input(|i| i.key_pressed(Key::Enter))
                            && submit_enabled)
                    {
                        result = CompilerPromptResult::Submit(prompt.input.clone());
                    }

                    ui.add_space(8.0);

                    if ui.button("Cancel").clicked() {
                        result = CompilerPromptResult::Cancelled;
                    }
                });
            });

            ui.add_space(4.0);
        });

    result
}

/// Report the outcome of a compiler check. Returns `true` when dismissed.
pub fn show_compiler_check(ctx: &egui::Context, check: &CompilerCheck, is_dark: bool) -> bool {
    let mut close = ctx.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter));

    egui::Window::new("🔍 Pandoc")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame(ctx, is_dark))
        .show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.add_space(8.0);

            match &check.found {
                Some(path) => {
                    ui.colored_label(Color32::from_rgb(80, 170, 90), "✔ Pandoc is installed");
                    ui.add_space(4.0);
                    ui.label(RichText::new(path.display().to_string()).monospace());
                }
                None => {
                    ui.colored_label(Color32::from_rgb(220, 80, 80), "✖ Pandoc was not found");
                    ui.add_space(4.0);
                    ui.label(format!("Looked for: {}", check.program));
                    ui.label(
                        RichText::new("Install Pandoc or set its path in Settings.")
                            .small()
                            .weak(),
                    );
                }
            }

            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        });

    close
}

/// Show an error message. Returns `true` when dismissed.
pub fn show_error_modal(ctx: &egui::Context, message: &str, is_dark: bool) -> bool {
    let mut close = ctx.input(|i| i.key_pressed(Key::Escape));

    egui::Window::new("⚠ Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(dialog_frame(ctx, is_dark))
        .show(ctx, |ui| {
            ui.set_min_width(360.0);
            ui.set_max_width(560.0);
            ui.add_space(8.0);

            egui::ScrollArea::vertical()
                .id_source("error_modal_text")
                .max_height(260.0)
                .show(ui, |ui| {
                    ui.label(message);
                });

            ui.add_space(12.0);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        });

    close
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_result_equality() {
        assert_eq!(CompilerPromptResult::None, CompilerPromptResult::None);
        assert_ne!(
            CompilerPromptResult::Submit("a".to_string()),
            CompilerPromptResult::Submit("b".to_string())
        );
    }
}
