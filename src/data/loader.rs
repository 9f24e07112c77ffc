use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui;

use super::model::ChartDataset;
use super::parser;

// ---------------------------------------------------------------------------
// Background file loading
// ---------------------------------------------------------------------------

/// Result of one load request, delivered back to the UI thread.
#[derive(Debug)]
pub struct LoadOutcome {
    /// File slot the request was made for.
    pub slot: usize,
    /// Generation of the request within its slot; stale outcomes are ignored.
    pub generation: u64,
    pub path: PathBuf,
    /// `None` when the file yielded no data.
    pub dataset: Option<ChartDataset>,
}

/// Parses chart files on worker threads so the UI never blocks on I/O.
pub struct BackgroundLoader {
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl Default for BackgroundLoader {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }
}

impl BackgroundLoader {
    /// Start parsing `path` for `slot`. When `ctx` is given, a repaint is
    /// requested once the result is queued.
    ///
    /// Returns `false` if no worker thread could be started.
    pub fn spawn(
        &self,
        slot: usize,
        generation: u64,
        path: PathBuf,
        ctx: Option<egui::Context>,
    ) -> bool {
        let tx = self.tx.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("chart-loader-{slot}"))
            .spawn(move || {
                let dataset = parser::parse(&path);
                let outcome = LoadOutcome {
                    slot,
                    generation,
                    path,
                    dataset,
                };
                // The receiver only disappears when the app is shutting down.
                if tx.send(outcome).is_ok() {
                    if let Some(ctx) = ctx {
                        ctx.request_repaint();
                    }
                }
            });

        match spawned {
            Ok(_) => true,
            Err(e) => {
                log::error!("Failed to start loader thread for slot {slot}: {e}");
                false
            }
        }
    }

    /// Drain all outcomes that have arrived so far.
    pub fn poll(&self) -> Vec<LoadOutcome> {
        self.rx.try_iter().collect()
    }

    /// Block until the next outcome arrives.
    #[cfg(test)]
    pub fn wait(&self) -> Option<LoadOutcome> {
        self.rx
            .recv_timeout(std::time::Duration::from_secs(10))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_file_on_worker_thread() {
        let tempdir = tempfile::tempdir().unwrap();
        let path = tempdir.path().join("a.txt");
        std::fs::write(&path, "#standard#a.txt\n#visibility#1\n1;2\n3;4\n").unwrap();

        let loader = BackgroundLoader::default();
        assert!(loader.spawn(1, 7, path.clone(), None));

        let outcome = loader.wait().unwrap();
        assert_eq!(outcome.slot, 1);
        assert_eq!(outcome.generation, 7);
        assert_eq!(outcome.path, path);
        let ds = outcome.dataset.unwrap();
        assert_eq!(ds.series()[0].len(), 2);
        assert!(loader.poll().is_empty());
    }

    #[test]
    fn missing_file_yields_no_dataset() {
        let tempdir = tempfile::tempdir().unwrap();
        let loader = BackgroundLoader::default();
        assert!(loader.spawn(0, 1, tempdir.path().join("nope.txt"), None));

        let outcome = loader.wait().unwrap();
        assert!(outcome.dataset.is_none());
    }
}
