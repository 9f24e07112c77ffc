use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use crate::color;
use crate::data::loader::BackgroundLoader;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar with one load button per file slot.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, loader: &BackgroundLoader) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for slot in 0..state.slots.len() {
                if ui.button(format!("Open File {}…", slot + 1)).clicked() {
                    open_file_dialog(ui.ctx(), state, loader, slot);
                    ui.close_menu();
                }
            }
        });

        ui.separator();

        for slot in 0..state.slots.len() {
            if ui.button(format!("Load File {}", slot + 1)).clicked() {
                open_file_dialog(ui.ctx(), state, loader, slot);
            }
            let entry = &state.slots[slot];
            if entry.loading {
                ui.spinner();
            }
            let name = entry.file_name().unwrap_or_else(|| "No file selected".to_string());
            ui.label(name);
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – series toggles
// ---------------------------------------------------------------------------

/// One row of `Series i: On/Off` buttons per file slot.
pub fn series_toggles(ui: &mut Ui, state: &mut AppState) {
    let available = state.available_series();
    if available.is_empty() {
        ui.label("No series loaded.");
        return;
    }

    for slot in 0..state.slots.len() {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(format!("File {}", slot + 1));
            let loaded = state.slots[slot].dataset.is_some();

            for &series_index in &available {
                let on = state.slots[slot].visibility.is_visible(series_index);
                let base = color::series_color(series_index);
                let fill = if on { base } else { color::dimmed(base) };
                let text = RichText::new(format!(
                    "Series {series_index}: {}",
                    if on { "On" } else { "Off" }
                ))
                .color(color::text_color_on(fill));

                let button = egui::Button::new(text).fill(fill);
                if ui.add_enabled(loaded, button).clicked() {
                    state.toggle_series(slot, series_index);
                }
            }
        });
    }
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(
    ctx: &egui::Context,
    state: &mut AppState,
    loader: &BackgroundLoader,
    slot: usize,
) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Select File {}", slot + 1))
        .add_filter("Chart files", &["txt", "dat", "csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        start_load(Some(ctx), state, loader, slot, path);
    }
}

/// Queue `path` for parsing into `slot` on a worker thread.
pub fn start_load(
    ctx: Option<&egui::Context>,
    state: &mut AppState,
    loader: &BackgroundLoader,
    slot: usize,
    path: PathBuf,
) {
    let Some(generation) = state.begin_load(slot, &path) else {
        log::warn!("Ignoring {}: no file slot {}", path.display(), slot + 1);
        return;
    };
    if !loader.spawn(slot, generation, path, ctx.cloned()) {
        state.abort_load(slot);
    }
}
