use serde::{Deserialize, Serialize};

/// One row of the energy dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    /// Label shown in the tooltip. Same as `country` for CSV input.
    pub name: String,
    pub country: String,
    /// Population in millions.
    pub population: f64,
    /// Gross domestic product in trillions of US dollars.
    pub gdp: f64,
    /// Energy consumption per capita in million BTU.
    pub epc: f64,
    /// Total energy consumption, see `total_energy`.
    pub total: f64,
}

impl CountryRecord {
    pub fn new(country: &str, population: f64, gdp: f64, epc: f64) -> Self {
        Self {
            name: country.to_owned(),
            country: country.to_owned(),
            population,
            gdp,
            epc,
            total: total_energy(epc, population),
        }
    }
}

/// Total energy use of a country from its per-capita use and population.
pub fn total_energy(epc: f64, population: f64) -> f64 {
    epc * population / 1000.0
}
