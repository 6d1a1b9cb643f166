//! slowDocs — cascading document windows for the Slow Computer
//!
//! A small library window spawns documents, each in its own OS window.
//! New documents step down-right from the previous one and remember their
//! frame across launches.

use eframe::NativeOptions;

mod app;
use app::SlowDocsApp;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([300.0, 340.0])
            .with_title("slowDocs"),
        ..Default::default()
    };

    eframe::run_native(
        "slowDocs",
        options,
        Box::new(|cc| Box::new(SlowDocsApp::new(cc))),
    )
}
