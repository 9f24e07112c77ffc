use std::path::PathBuf;

use chart_viewer::app::ChartViewerApp;
use chart_viewer::config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::discover();
    let initial_files: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chart Viewer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(ChartViewerApp::new(
                config,
                initial_files,
                &cc.egui_ctx,
            )))
        }),
    )
}
