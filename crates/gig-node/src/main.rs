//! Gig Node: a freelance marketplace desktop client

use eframe::egui;

use gig_node::app::App;

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!(git = env!("GIT_HASH"), "Starting Gig Node");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Gig Node")
            .with_inner_size([980.0, 700.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Gig Node",
        native_options,
        Box::new(|cc| Ok(Box::new(App::new(cc)))),
    )
}
