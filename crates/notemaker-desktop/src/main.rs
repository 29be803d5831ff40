//! NoteMaker Desktop Application
//!
//! A single window with a note form and the note list, backed by the managed
//! GraphQL notes service.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod components;
mod services;
mod state;
mod views;

use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("notemaker=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting NoteMaker...");

    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("NoteMaker")
            .with_inner_size(LogicalSize::new(520.0, 640.0)),
    );

    dioxus::LaunchBuilder::new()
        .with_cfg(config)
        .launch(app::App);
}
