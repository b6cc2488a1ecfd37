#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod cli;
pub mod export;
pub mod loader;
pub mod plot;
pub mod record;

pub use app::canvas;
pub use app::config::Config;
pub use app::ScatterApp;
pub use loader::{BackendAppState, NumericPolicy};
pub use plot::{Layout, PlotError, ScatterPlot};
pub use record::CountryRecord;
