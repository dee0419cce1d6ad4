// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Quire - Main Entry Point
//!
//! A stylesheet editor for Markdown book projects with live HTML preview and
//! EPUB compilation through Pandoc. Built with Rust and egui.

mod app;
mod compile;
mod config;
mod css;
mod editor;
mod error;
mod files;
mod preview;
mod project;
mod session;
mod state;
mod theme;
mod ui;

use app::QuireApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Quire";

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    // Load settings to get window configuration
    let settings = load_config();
    let window_size = &settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([720.0, 480.0])
        .with_maximized(window_size.maximized)
        .with_drag_and_drop(true);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(QuireApp::new(cc)))),
    )
}
