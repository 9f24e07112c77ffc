/// Data layer: core types, parsing, downsampling and background loading.
///
/// Architecture:
/// ```text
///  chart file (.txt / .dat)
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  parse file → ChartDataset (8 series + mask)
///   └──────────┘
///        │            ▲ run on a worker thread by `loader`
///        ▼
///   ┌──────────────┐
///   │ ChartDataset │  immutable, one per file slot
///   └──────────────┘
///        │   + VisibilityMask per slot (owned by the UI)
///        ▼
///   ┌────────────┐
///   │ downsample │  stride sampling + axis ranges → ChartView
///   └────────────┘
/// ```

pub mod downsample;
pub mod loader;
pub mod model;
pub mod parser;
