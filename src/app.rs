use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;

use crate::config::ViewerConfig;
use crate::data::loader::BackgroundLoader;
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ChartViewerApp {
    pub state: AppState,
    loader: BackgroundLoader,
}

impl ChartViewerApp {
    /// Build the app and queue `initial_files`, one per slot in order.
    pub fn new(config: ViewerConfig, initial_files: Vec<PathBuf>, ctx: &egui::Context) -> Self {
        let mut app = Self {
            state: AppState::new(config),
            loader: BackgroundLoader::default(),
        };

        let slots = app.state.slots.len();
        if initial_files.len() > slots {
            log::warn!(
                "{} files given but only {slots} slots; ignoring the rest",
                initial_files.len()
            );
        }
        for (slot, path) in initial_files.into_iter().take(slots).enumerate() {
            panels::start_load(Some(ctx), &mut app.state, &app.loader, slot, path);
        }
        app
    }
}

impl eframe::App for ChartViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for outcome in self.loader.poll() {
            self.state.apply_outcome(outcome);
        }
        if self.state.is_loading() {
            // Workers request a repaint when done; this covers a missed wakeup.
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        // ---- Top panel: load buttons ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.loader);
        });

        // ---- Bottom panel: series toggles ----
        egui::TopBottomPanel::bottom("series_toggles")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                panels::series_toggles(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::chart_plot(ui, &mut self.state);
        });
    }
}
