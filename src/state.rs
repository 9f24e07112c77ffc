use std::path::{Path, PathBuf};

use crate::config::ViewerConfig;
use crate::data::downsample::{ChartView, downsample_and_scale};
use crate::data::loader::LoadOutcome;
use crate::data::model::{ChartDataset, MAX_SERIES, VisibilityMask};

// ---------------------------------------------------------------------------
// File slot
// ---------------------------------------------------------------------------

/// One "Load File" position: at most one dataset and the mask applied to it.
#[derive(Debug, Default)]
pub struct FileSlot {
    pub path: Option<PathBuf>,
    pub dataset: Option<ChartDataset>,
    /// Live visibility, seeded from the dataset and toggled by the user.
    pub visibility: VisibilityMask,
    pub loading: bool,
    /// Bumped on each load request so only the latest outcome lands.
    generation: u64,
}

impl FileSlot {
    pub fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewerConfig,
    pub slots: Vec<FileSlot>,
    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
    /// Cached chart contents; rebuilt after loads and toggles.
    view: Option<ChartView>,
    /// Plot bounds should snap to the data ranges on the next frame.
    fit_pending: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let slots = (0..config.slot_count()).map(|_| FileSlot::default()).collect();
        Self {
            config,
            slots,
            status_message: None,
            view: None,
            fit_pending: false,
        }
    }

    /// Mark `slot` as loading `path`; returns the generation to tag the
    /// request with, or `None` for an unknown slot.
    pub fn begin_load(&mut self, slot: usize, path: &Path) -> Option<u64> {
        let entry = self.slots.get_mut(slot)?;
        entry.generation += 1;
        entry.loading = true;
        self.status_message = None;
        log::info!("Loading {} into slot {}", path.display(), slot + 1);
        Some(entry.generation)
    }

    /// Loader thread could not be started; clear the loading flag.
    pub fn abort_load(&mut self, slot: usize) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.loading = false;
        }
        self.status_message = Some("Error: could not start file loader".to_string());
    }

    /// Ingest a finished load. A failed load keeps the slot's previous data.
    pub fn apply_outcome(&mut self, outcome: LoadOutcome) {
        let Some(entry) = self.slots.get_mut(outcome.slot) else {
            return;
        };
        if outcome.generation != entry.generation {
            log::debug!(
                "Dropping stale load of {} for slot {}",
                outcome.path.display(),
                outcome.slot + 1
            );
            return;
        }
        entry.loading = false;

        match outcome.dataset {
            Some(dataset) => {
                log::info!(
                    "Loaded {}: {} series, {} points, mask {}",
                    outcome.path.display(),
                    dataset.populated_series(),
                    dataset.total_points(),
                    dataset.visibility()
                );
                entry.visibility = dataset.visibility().clone();
                entry.dataset = Some(dataset);
                entry.path = Some(outcome.path);
                self.status_message = None;
                self.fit_pending = true;
                self.invalidate();
            }
            None => {
                let name = outcome
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| outcome.path.display().to_string());
                self.status_message = Some(format!("No chart data in {name}"));
            }
        }
    }

    /// Flip one series of one slot.
    pub fn toggle_series(&mut self, slot: usize, series_index: usize) {
        let toggled = self
            .slots
            .get_mut(slot)
            .is_some_and(|s| s.visibility.toggle(series_index));
        if toggled {
            self.invalidate();
        }
    }

    /// Whether any loaded slot has points in `series_index`.
    pub fn series_available(&self, series_index: usize) -> bool {
        self.slots
            .iter()
            .filter_map(|s| s.dataset.as_ref())
            .any(|ds| ds.has_data(series_index))
    }

    /// Series indices that get a toggle button.
    pub fn available_series(&self) -> Vec<usize> {
        (0..MAX_SERIES)
            .filter(|&i| self.series_available(i))
            .collect()
    }

    pub fn has_data(&self) -> bool {
        self.slots.iter().any(|s| s.dataset.is_some())
    }

    pub fn is_loading(&self) -> bool {
        self.slots.iter().any(|s| s.loading)
    }

    /// Slot index of each layer passed to the downsampler, in order.
    pub fn layer_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.dataset.is_some())
            .map(|(i, _)| i)
            .collect()
    }

    /// Current chart contents, recomputed only after a change.
    pub fn chart_view(&mut self) -> &ChartView {
        let slots = &self.slots;
        let downsample = &self.config.downsample;
        self.view.get_or_insert_with(|| {
            let layers: Vec<(&ChartDataset, &VisibilityMask)> = slots
                .iter()
                .filter_map(|s| s.dataset.as_ref().map(|ds| (ds, &s.visibility)))
                .collect();
            downsample_and_scale(&layers, downsample)
        })
    }

    /// Returns `true` once after each successful load.
    pub fn take_fit_request(&mut self) -> bool {
        std::mem::take(&mut self.fit_pending)
    }

    fn invalidate(&mut self) {
        self.view = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parser::parse_chart_text;

    fn outcome(slot: usize, generation: u64, text: Option<&str>) -> LoadOutcome {
        LoadOutcome {
            slot,
            generation,
            path: PathBuf::from(format!("slot{slot}.txt")),
            dataset: text.map(|t| parse_chart_text(t).unwrap()),
        }
    }

    const FILE_A: &str = "#standard#a\n#visibility#1#0#1\n1;2|3;4|5;6\n7;8|9;10|11;12\n";
    const FILE_B: &str = "#standard#b\n#visibility#1#1\n-1;-1|0;100\n";

    #[test]
    fn load_seeds_mask_from_dataset() {
        let mut state = AppState::default();
        let generation = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        assert!(state.is_loading());
        state.apply_outcome(outcome(0, generation, Some(FILE_A)));

        assert!(!state.is_loading());
        assert!(state.take_fit_request());
        assert!(!state.take_fit_request());
        assert_eq!(state.slots[0].visibility.as_slice(), &[true, false, true]);
        assert_eq!(state.slots[0].file_name().as_deref(), Some("slot0.txt"));
        assert_eq!(state.available_series(), vec![0, 1, 2]);

        let view = state.chart_view();
        assert_eq!(view.series.len(), 2);
        assert_eq!(view.y_range.min, 2.0);
        assert_eq!(view.y_range.max, 12.0);
    }

    #[test]
    fn toggle_invalidates_view() {
        let mut state = AppState::default();
        let generation = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        state.apply_outcome(outcome(0, generation, Some(FILE_A)));
        assert_eq!(state.chart_view().series.len(), 2);

        state.toggle_series(0, 1);
        assert_eq!(state.chart_view().series.len(), 3);

        // Undeclared slot stays hidden.
        state.toggle_series(0, 6);
        assert!(!state.slots[0].visibility.is_visible(6));
        state.toggle_series(9, 0);
    }

    #[test]
    fn two_slots_pool_ranges() {
        let mut state = AppState::default();
        let g0 = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        let g1 = state.begin_load(1, Path::new("slot1.txt")).unwrap();
        state.apply_outcome(outcome(1, g1, Some(FILE_B)));
        state.apply_outcome(outcome(0, g0, Some(FILE_A)));

        assert_eq!(state.layer_slots(), vec![0, 1]);
        let view = state.chart_view();
        assert_eq!(view.x_range.min, -1.0);
        assert_eq!(view.y_range.max, 100.0);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = AppState::default();
        let g = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        state.apply_outcome(outcome(0, g, Some(FILE_A)));

        let g = state.begin_load(0, Path::new("broken.txt")).unwrap();
        state.apply_outcome(outcome(0, g, None));

        assert!(state.slots[0].dataset.is_some());
        assert_eq!(state.status_message.as_deref(), Some("No chart data in slot0.txt"));
    }

    #[test]
    fn stale_outcome_is_ignored() {
        let mut state = AppState::default();
        let first = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        let second = state.begin_load(0, Path::new("slot0.txt")).unwrap();
        assert_ne!(first, second);

        state.apply_outcome(outcome(0, first, Some(FILE_A)));
        assert!(state.slots[0].dataset.is_none());
        assert!(state.slots[0].loading);

        state.apply_outcome(outcome(0, second, Some(FILE_B)));
        assert!(state.slots[0].dataset.is_some());
    }

    #[test]
    fn empty_state_falls_back_to_unit_ranges() {
        let mut state = AppState::default();
        assert!(!state.has_data());
        assert!(state.begin_load(7, Path::new("x")).is_none());
        let view = state.chart_view();
        assert!(view.is_empty());
        assert_eq!(view.x_range.max, 1.0);
    }
}
