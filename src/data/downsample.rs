use serde::{Deserialize, Serialize};

use super::model::{ChartDataset, MAX_SERIES, Point, VisibilityMask};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Point-count thresholds for stride downsampling.
///
/// Series longer than `max_points` are thinned to roughly `min_points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownsampleConfig {
    pub min_points: usize,
    pub max_points: usize,
}

impl Default for DownsampleConfig {
    fn default() -> Self {
        Self {
            min_points: 400,
            max_points: 800,
        }
    }
}

impl DownsampleConfig {
    /// Sampling stride for a series of `len` points (1 keeps everything).
    pub fn stride(&self, len: usize) -> usize {
        if len <= self.max_points {
            1
        } else {
            (len / self.min_points.max(1)).max(1)
        }
    }
}

/// Keep every `stride`-th point, starting with index 0.
pub fn downsample(points: &[Point], config: &DownsampleConfig) -> Vec<Point> {
    let step = config.stride(points.len());
    points.iter().step_by(step).copied().collect()
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Closed interval on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Used when nothing is visible.
    pub const UNIT: AxisRange = AxisRange { min: 0.0, max: 1.0 };

    fn include(self, value: f64) -> Self {
        AxisRange {
            min: self.min.min(value),
            max: self.max.max(value),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

// ---------------------------------------------------------------------------
// ChartView – what the plot widget draws
// ---------------------------------------------------------------------------

/// Downsampled points of one visible series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesView {
    /// Position of the dataset in the layer list.
    pub dataset_index: usize,
    /// Series slot inside the dataset (0..8).
    pub series_index: usize,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub series: Vec<SeriesView>,
    pub x_range: AxisRange,
    pub y_range: AxisRange,
}

impl ChartView {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Downsample every visible series of every dataset and compute axis ranges
/// over the resulting points.
///
/// Each layer pairs a dataset with the mask currently applied to it. Output
/// is ordered by series index, then by dataset. Hidden and empty series are
/// left out entirely; with nothing left both ranges are [`AxisRange::UNIT`].
pub fn downsample_and_scale(
    layers: &[(&ChartDataset, &VisibilityMask)],
    config: &DownsampleConfig,
) -> ChartView {
    let mut series = Vec::new();
    let mut bounds: Option<(AxisRange, AxisRange)> = None;

    for series_index in 0..MAX_SERIES {
        for (dataset_index, (dataset, mask)) in layers.iter().enumerate() {
            if !mask.is_visible(series_index) {
                continue;
            }
            let Some(source) = dataset.series_at(series_index).filter(|s| !s.is_empty()) else {
                continue;
            };
            let points = downsample(source, config);

            for p in &points {
                bounds = Some(match bounds {
                    Some((x, y)) => (x.include(p.x), y.include(p.y)),
                    None => (
                        AxisRange { min: p.x, max: p.x },
                        AxisRange { min: p.y, max: p.y },
                    ),
                });
            }

            series.push(SeriesView {
                dataset_index,
                series_index,
                points,
            });
        }
    }

    let (x_range, y_range) = bounds.unwrap_or((AxisRange::UNIT, AxisRange::UNIT));
    log::debug!(
        "Downsampled {} visible series, x {:?}, y {:?}",
        series.len(),
        x_range,
        y_range
    );

    ChartView {
        series,
        x_range,
        y_range,
    }
}
