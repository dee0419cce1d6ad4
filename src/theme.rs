//! Light/dark visuals
//!
//! Holds the active theme and applies it to the egui context when it changes.

use crate::config::Theme;
use eframe::egui::{Color32, Context, Visuals};
use log::{debug, info};

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    needs_apply: bool,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            needs_apply: true,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Set the theme; it is applied on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Switch between light and dark. Returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        let new_theme = self.current_theme.toggle();
        self.set_theme(new_theme);
        new_theme
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    pub fn apply(&mut self, ctx: &Context) {
        ctx.set_visuals(visuals_for(self.current_theme));
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
    }

    /// Returns `true` if the theme was applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.needs_apply {
            self.apply(ctx);
            true
        } else {
            false
        }
    }
}

fn visuals_for(theme: Theme) -> Visuals {
    match theme {
        Theme::Light => {
            let mut visuals = Visuals::light();
            visuals.panel_fill = Color32::from_rgb(248, 248, 248);
            visuals.extreme_bg_color = Color32::WHITE;
            visuals
        }
        Theme::Dark => {
            let mut visuals = Visuals::dark();
            visuals.panel_fill = Color32::from_rgb(32, 32, 32);
            visuals.extreme_bg_color = Color32::from_rgb(24, 24, 24);
            visuals
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_needs_apply() {
        let manager = ThemeManager::new(Theme::Dark);
        assert!(manager.needs_apply());
        assert_eq!(manager.current_theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle() {
        let mut manager = ThemeManager::new(Theme::Light);
        assert_eq!(manager.toggle(), Theme::Dark);
        assert_eq!(manager.toggle(), Theme::Light);
    }

    #[test]
    fn test_set_same_theme_does_not_reapply() {
        let mut manager = ThemeManager::new(Theme::Light);
        manager.needs_apply = false;
        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());
        manager.set_theme(Theme::Dark);
        assert!(manager.needs_apply());
    }

    #[test]
    fn test_visuals_match_theme() {
        assert!(visuals_for(Theme::Dark).dark_mode);
        assert!(!visuals_for(Theme::Light).dark_mode);
    }
}
