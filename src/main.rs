mod app;
mod color;
mod data;
mod error;
mod pipeline;
mod state;
mod ui;

use app::RustyCorrApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Corr – CSV Correlation Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyCorrApp::default()))),
    )
}
