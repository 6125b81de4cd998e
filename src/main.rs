//! Notefold - Notion-like notebook of folders and pages
//!
//! Pages and folders live in an in-memory tree for the length of a session
//! and can be exported as JSON, HTML or Markdown files.

mod app;
mod core;
mod ui;

use app::NotefoldApp;
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::filter::LevelFilter::INFO)
        .init();

    tracing::info!("Starting Notefold...");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([720.0, 480.0])
            .with_title("Notefold"),
        ..Default::default()
    };

    eframe::run_native(
        "Notefold",
        native_options,
        Box::new(|cc| Ok(Box::new(NotefoldApp::new(cc)))),
    )
}
