//! Reading the energy dataset from CSV.
//!
//! The CSV needs the columns `country`, `population`, `gdp` and `ecc`
//! (energy consumption per capita). Other columns are ignored.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::mpsc::Sender,
};

use app_core::{
    backend::{BackendEventLoop, BackendLink, BackendRequest, BackendState, LinkReceiver},
    string_error::ErrorStringExt,
};
use thiserror::Error;
use turbo_csv::{CsvError, Parser, Row, Table};

use crate::record::CountryRecord;

pub const COUNTRY: &str = "country";
pub const POPULATION: &str = "population";
pub const GDP: &str = "gdp";
pub const ECC: &str = "ecc";
const REQUIRED_COLUMNS: [&str; 4] = [COUNTRY, POPULATION, GDP, ECC];

/// What to do with cells that do not hold a usable number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NumericPolicy {
    /// Fail the load on non-numeric, missing, non-finite or negative cells.
    #[default]
    Strict,
    /// Turn unusable cells into NaN and keep going.
    Passthrough,
}

impl FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "passthrough" => Ok(Self::Passthrough),
            other => Err(format!("unknown numeric policy '{other}'")),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Csv(#[from] CsvError),
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
    #[error("line {line}: '{value}' in column '{column}' is not a number")]
    InvalidNumber {
        line: usize,
        column: &'static str,
        value: String,
    },
    #[error("line {line}: column '{column}' is negative ({value})")]
    NegativeValue {
        line: usize,
        column: &'static str,
        value: f64,
    },
}

pub fn load_path(path: &Path, policy: NumericPolicy) -> Result<Vec<CountryRecord>, LoadError> {
    log::info!("loading {:?} ({:?})", path, policy);
    let table = Parser::from_path(path)?.parse()?;
    parse_table(&table, policy)
}

pub fn load_str(text: &str, policy: NumericPolicy) -> Result<Vec<CountryRecord>, LoadError> {
    let table = Parser::from_string(text.to_owned()).parse()?;
    parse_table(&table, policy)
}

/// Turn every row of `table` into a record, keeping the row order.
pub fn parse_table(table: &Table, policy: NumericPolicy) -> Result<Vec<CountryRecord>, LoadError> {
    if let Some(missing) = REQUIRED_COLUMNS
        .into_iter()
        .find(|column| table.column(column).is_none())
    {
        return Err(LoadError::MissingColumn(missing));
    }
    let records = table
        .rows()
        .map(|row| parse_row(&row, policy))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("parsed {} records", records.len());
    Ok(records)
}

fn parse_row(row: &Row<'_>, policy: NumericPolicy) -> Result<CountryRecord, LoadError> {
    let country = row.get(COUNTRY).unwrap_or_default();
    let population = parse_number(row, POPULATION, policy)?;
    let gdp = parse_number(row, GDP, policy)?;
    let epc = parse_number(row, ECC, policy)?;
    Ok(CountryRecord::new(country, population, gdp, epc))
}

fn parse_number(row: &Row<'_>, column: &'static str, policy: NumericPolicy) -> Result<f64, LoadError> {
    let raw = row.get(column).unwrap_or_default();
    let parsed = raw.parse::<f64>().ok().filter(|v| v.is_finite());
    match (parsed, policy) {
        (Some(value), NumericPolicy::Strict) if value < 0.0 => Err(LoadError::NegativeValue {
            line: row.line(),
            column,
            value,
        }),
        (Some(value), _) => Ok(value),
        (None, NumericPolicy::Strict) => Err(LoadError::InvalidNumber {
            line: row.line(),
            column,
            value: raw.to_owned(),
        }),
        (None, NumericPolicy::Passthrough) => {
            log::warn!(
                "line {}: '{}' in column '{}' is not a number, using NaN",
                row.line(),
                raw,
                column
            );
            Ok(f64::NAN)
        }
    }
}

// ----------------------------------------------------------------------------
//
//
// Loading on the backend thread
//
//
// ----------------------------------------------------------------------------

/// State of the backend thread.
#[derive(Debug, Default)]
pub struct BackendAppState {
    loads: usize,
}

impl BackendState for BackendAppState {}

impl BackendAppState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub type DynRequestSender = Sender<Box<dyn BackendRequest<BackendAppState>>>;

pub type LoadResult = Result<Vec<CountryRecord>, String>;

/// Load `path` on the backend thread. The reply arrives on the returned
/// receiver; dropping it cancels the load if it has not started yet.
pub fn request_load(
    request_tx: &DynRequestSender,
    path: &Path,
    policy: NumericPolicy,
) -> LinkReceiver<LoadResult> {
    let path: PathBuf = path.to_path_buf();
    let description = format!("load {:?}", path);
    let (rx, linker) = BackendLink::new(
        &description,
        move |b: &mut BackendEventLoop<BackendAppState>| {
            b.state.loads += 1;
            log::debug!("backend load number {}", b.state.loads);
            load_path(&path, policy).err_to_string(&format!("could not load {:?}", path))
        },
    );
    if request_tx.send(Box::new(linker)).is_err() {
        log::error!("backend thread is gone, unable to {}", description);
    }
    rx
}
