//! Settings Panel Component for Quire
//!
//! Modal settings window. Changes are applied live and saved automatically.

use crate::config::{Settings, Theme};
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Project,
    Compiler,
    Preview,
}

impl SettingsSection {
    const ALL: [SettingsSection; 4] = [
        SettingsSection::Appearance,
        SettingsSection::Project,
        SettingsSection::Compiler,
        SettingsSection::Preview,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Project => "Project",
            SettingsSection::Compiler => "Compiler",
            SettingsSection::Preview => "Preview",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Project => "📚",
            SettingsSection::Compiler => "📖",
            SettingsSection::Preview => "🌐",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    /// Whether the panel should be closed.
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
    /// Whether an explicit compiler check was requested.
    pub check_compiler_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
    /// Text boxes that are only committed when they lose focus
    root_class_input: Option<String>,
    compiler_path_input: Option<String>,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);

                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(520.0)
            .max_width(620.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in SettingsSection::ALL {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());

                            let btn = ui.add_sized(
                                [110.0, 32.0],
                                egui::SelectableLabel::new(
                                    selected,
                                    RichText::new(text).size(14.0),
                                ),
                            );
                            if btn.clicked() {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                            self.root_class_input = None;
                            self.compiler_path_input = None;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(370.0);
                        ui.set_min_height(320.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => self.show_appearance_section(ui, settings),
                            SettingsSection::Project => self.show_project_section(ui, settings),
                            SettingsSection::Compiler => {
                                self.show_compiler_section(ui, settings, &mut output)
                            }
                            SettingsSection::Preview => self.show_preview_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }

    fn show_appearance_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Appearance");
        ui.add_space(8.0);

        ui.label(RichText::new("Theme").strong());
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            for (theme, label) in [(Theme::Light, "☀ Light"), (Theme::Dark, "🌙 Dark")] {
                if ui
                    .selectable_value(&mut settings.theme, theme, label)
                    .changed()
                {
                    changed = true;
                }
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Editor Font Size").strong());
            ui.add_space(8.0);
            ui.label(format!("{}px", settings.font_size as u32));
        });
        ui.add_space(4.0);

        let font_slider = ui.add(
            egui::Slider::new(
                &mut settings.font_size,
                Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
            )
            .show_value(false)
            .step_by(1.0),
        );
        if font_slider.changed() {
            changed = true;
        }

        ui.horizontal(|ui| {
            for (label, size) in [("Small", 12.0), ("Medium", 14.0), ("Large", 18.0)] {
                if ui.small_button(label).clicked() {
                    settings.font_size = size;
                    changed = true;
                }
            }
        });

        changed
    }

    fn show_project_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Project");
        ui.add_space(8.0);

        // Root class
        ui.label(RichText::new("Book Root Class").strong());
        ui.label(
            RichText::new("Class of the element that wraps the book in the preview")
                .small()
                .weak(),
        );
        ui.add_space(4.0);

        let input = self
            .root_class_input
            .get_or_insert_with(|| settings.root_class.clone());
        let response = ui.add(
            egui::TextEdit::singleline(input)
                .hint_text(Settings::DEFAULT_ROOT_CLASS)
                .desired_width(220.0)
                .font(egui::TextStyle::Monospace),
        );
        if response.lost_focus() {
            let normalized = Settings::normalize_root_class(input);
            if !normalized.is_empty()
                && !normalized.contains(char::is_whitespace)
                && normalized != settings.root_class
            {
                settings.root_class = normalized;
                changed = true;
            }
            self.root_class_input = None;
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        // Undo
        ui.horizontal(|ui| {
            ui.label(RichText::new("Undo Steps").strong());
            ui.add_space(8.0);
            ui.label(format!("{}", settings.history_capacity));
        });
        let mut capacity = settings.history_capacity as f32;
        if ui
            .add(
                egui::Slider::new(
                    &mut capacity,
                    Settings::MIN_HISTORY_CAPACITY as f32..=1000.0,
                )
                .show_value(false)
                .step_by(10.0),
            )
            .on_hover_text("Takes effect when a project is opened")
            .changed()
        {
            settings.history_capacity = capacity as usize;
            changed = true;
        }

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Typing Pause").strong());
            ui.add_space(8.0);
            ui.label(format!("{} ms", settings.typing_debounce_ms));
        });
        if ui
            .add(
                egui::Slider::new(&mut settings.typing_debounce_ms, 0..=2000)
                    .show_value(false)
                    .step_by(50.0),
            )
            .on_hover_text("Idle time before typed text becomes an undo step")
            .changed()
        {
            changed = true;
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui
                .button("Clear Recent Projects")
                .on_hover_text("Forget recently opened project folders")
                .clicked()
            {
                settings.recent_projects.clear();
                changed = true;
            }
            if !settings.recent_projects.is_empty() {
                ui.label(
                    RichText::new(format!("({} projects)", settings.recent_projects.len()))
                        .small()
                        .weak(),
                );
            }
        });

        changed
    }

    fn show_compiler_section(
        &mut self,
        ui: &mut Ui,
        settings: &mut Settings,
        output: &mut SettingsPanelOutput,
    ) -> bool {
        let mut changed = false;

        ui.heading("Compiler");
        ui.add_space(8.0);

        ui.label(RichText::new("Pandoc Path").strong());
        ui.label(
            RichText::new("Leave empty to look in the usual install locations and PATH")
                .small()
                .weak(),
        );
        ui.add_space(4.0);

        let input = self
            .compiler_path_input
            .get_or_insert_with(|| settings.compiler_path.clone().unwrap_or_default());
        let response = ui.add(
            egui::TextEdit::singleline(input)
                .hint_text("pandoc")
                .desired_width(340.0),
        );
        if response.lost_focus() {
            let before = settings.compiler_path.clone();
            settings.set_compiler_path(input);
            changed |= settings.compiler_path != before;
            self.compiler_path_input = None;
        }

        ui.add_space(4.0);
        if ui.button("Check Installation").clicked() {
            output.check_compiler_requested = true;
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        let mut limited = settings.compile_timeout_secs.is_some();
        if ui
            .checkbox(&mut limited, "Time Limit")
            .on_hover_text("Stop Pandoc if it runs longer than this")
            .changed()
        {
            settings.compile_timeout_secs = limited.then_some(120);
            changed = true;
        }

        if let Some(secs) = settings.compile_timeout_secs.as_mut() {
            ui.horizontal(|ui| {
                ui.label("Seconds:");
                if ui
                    .add(egui::DragValue::new(secs).clamp_range(5..=3600))
                    .changed()
                {
                    changed = true;
                }
            });
        }

        changed
    }

    fn show_preview_section(&mut self, ui: &mut Ui, settings: &mut Settings) -> bool {
        let mut changed = false;

        ui.heading("Preview");
        ui.add_space(8.0);

        if ui
            .checkbox(
                &mut settings.open_preview_after_load,
                "Open Preview After Loading a Project",
            )
            .changed()
        {
            changed = true;
        }

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(RichText::new("Browser Auto-Refresh").strong());
            ui.add_space(8.0);
            if settings.preview_refresh_secs == 0 {
                ui.label("off");
            } else {
                ui.label(format!("every {} s", settings.preview_refresh_secs));
            }
        });
        if ui
            .add(
                egui::Slider::new(
                    &mut settings.preview_refresh_secs,
                    0..=Settings::MAX_REFRESH_SECS,
                )
                .show_value(false),
            )
            .on_hover_text("The preview page reloads itself at this interval (0 turns it off)")
            .changed()
        {
            changed = true;
        }

        changed
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
