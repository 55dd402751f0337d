// Hide console window in release builds (Windows GUI app)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod payload;
mod scanner;
mod state;
mod ui;
mod verify;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Command-line overrides for a single run
#[derive(Parser, Debug)]
#[command(
    name = "turnstile",
    version,
    about = "Native QR check-in scanner for event entry"
)]
struct Args {
    /// Override the check-in service base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Override the camera device index
    #[arg(long, value_name = "INDEX")]
    camera: Option<u32>,
}

/// Load the application icon from embedded PNG data
fn load_icon() -> Option<egui::IconData> {
    let icon_data = include_bytes!("../assets/icon.png");
    let image = image::load_from_memory(icon_data).ok()?.into_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "turnstile=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("Starting Turnstile scanner");

    let mut config = Config::load().unwrap_or_default();
    if let Some(url) = args.base_url {
        tracing::info!("Service URL override: {}", url);
        config.verification.base_url = url;
    }
    if let Some(index) = args.camera {
        tracing::info!("Camera override: {}", index);
        config.scanner.camera_index = Some(index);
    }

    // Load application icon
    let icon = load_icon().map(Arc::new);

    // Configure native options
    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([480.0, 680.0])
        .with_min_inner_size([400.0, 560.0])
        .with_title("Turnstile - Event Check-in");

    let viewport = if let Some(icon) = icon {
        viewport.with_icon(icon)
    } else {
        tracing::warn!("Failed to load application icon");
        viewport
    };

    let native_options = eframe::NativeOptions {
        viewport,
        persist_window: true, // Save/restore window size and position
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Turnstile",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::TurnstileApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {}", e))?;

    Ok(())
}
