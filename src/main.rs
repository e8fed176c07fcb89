#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::Path;

use sketch_vision::SketchApp;
use sketch_vision::config::{AppConfig, CONFIG_FILE_NAME};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE_NAME));

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Sketch Vision AI")
            .with_inner_size([1100.0, 860.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sketch Vision AI",
        native_options,
        Box::new(move |cc| Ok(Box::new(SketchApp::new(cc, config)?))),
    )
}
