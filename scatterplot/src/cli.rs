use std::path::PathBuf;

use clap::Parser;

use crate::loader::NumericPolicy;

/// Scatterplot of GDP against energy consumption per capita.
///
/// Opens a viewer unless `--export` or `--geometry` is given.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// CSV file with the columns country, population, gdp and ecc.
    pub data_path: Option<PathBuf>,
    /// How to treat cells that are not usable numbers.
    #[arg(long, value_enum)]
    pub policy: Option<NumericPolicy>,
    /// Width of the chart in pixels.
    #[arg(long)]
    pub width: Option<u64>,
    /// Height of the chart in pixels.
    #[arg(long)]
    pub height: Option<u64>,
    /// Write the chart as SVG to this path and exit.
    #[arg(long, value_name = "SVG")]
    pub export: Option<PathBuf>,
    /// Write the point geometry as JSON to this path and exit.
    #[arg(long, value_name = "JSON")]
    pub geometry: Option<PathBuf>,
    /// Do not read the config file from the home directory.
    #[arg(long)]
    pub no_config: bool,
}

impl Args {
    pub fn is_headless(&self) -> bool {
        self.export.is_some() || self.geometry.is_some()
    }
}
