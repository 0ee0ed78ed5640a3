#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use roadmap_gantt::app::RoadmapApp;
use roadmap_gantt::config::AppSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    let settings = AppSettings::load();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1360.0, 780.0])
            .with_min_inner_size([900.0, 480.0])
            .with_title("Roadmap Gantt"),
        ..Default::default()
    };

    eframe::run_native(
        "Roadmap Gantt",
        options,
        Box::new(|cc| Ok(Box::new(RoadmapApp::new(cc, settings)))),
    )
}
