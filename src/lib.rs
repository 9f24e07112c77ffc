//! Desktop viewer for multi-series `x;y` chart files.
//!
//! The core is [`data::parser::parse`] (file → [`data::model::ChartDataset`])
//! and [`data::downsample::downsample_and_scale`] (datasets + visibility
//! masks → [`data::downsample::ChartView`]). Everything else is egui glue.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
