// Risk-area consolidation
//
// Merges the census household risk table with the georeferenced point
// exports (geological, hydrological, exact) into the dashboard data file.

pub mod consolidator;
pub mod csv_loader;
pub mod output;
pub mod rules;

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

pub use consolidator::{consolidate, RiskRecord, RiskType, Severity};
pub use csv_loader::{load_points, read_csv_rows, HouseholdRow, PointLookups, PointSource};
pub use output::render_data_js;
pub use rules::{ConsolidationRules, SectorDetails};

#[derive(Error, Debug)]
pub enum ConsolidateError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input and output locations of one consolidation run.
#[derive(Debug, Clone)]
pub struct RiskInputs {
    pub households: PathBuf,
    pub geological_points: PathBuf,
    pub hydrological_points: PathBuf,
    pub exact_points: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidationSummary {
    pub geological_coordinates: usize,
    pub hydrological_coordinates: usize,
    pub exact_coordinates: usize,
    pub records: usize,
    pub records_with_coordinates: usize,
}

/// Load rules from a JSON file.
pub fn load_rules(path: &std::path::Path) -> Result<ConsolidationRules, ConsolidateError> {
    let content = fs::read_to_string(path).map_err(|source| ConsolidateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Run the whole consolidation and write the data file. Only the household
/// table is required; point exports that cannot be read are skipped.
pub fn run_consolidation(
    inputs: &RiskInputs,
    rules: &ConsolidationRules,
) -> Result<ConsolidationSummary, ConsolidateError> {
    let mut lookups = PointLookups::default();

    info!("Loading Geo Coords...");
    let geological_coordinates = load_points(
        &mut lookups,
        &inputs.geological_points,
        PointSource::Geological,
        rules,
    );
    info!("Loading Hydro Coords...");
    let hydrological_coordinates = load_points(
        &mut lookups,
        &inputs.hydrological_points,
        PointSource::Hydrological,
        rules,
    );
    info!("Loading Exact Coords...");
    let exact_coordinates =
        load_points(&mut lookups, &inputs.exact_points, PointSource::Exact, rules);

    info!(
        "Total Coordinates Loaded: {} (Geo: {}, Hydro: {}, Exatos: {})",
        lookups.coordinate_count(),
        geological_coordinates,
        hydrological_coordinates,
        exact_coordinates
    );

    let households: Vec<HouseholdRow> = read_csv_rows(&inputs.households)?;
    let records = consolidate(households, &lookups, rules);
    let js = render_data_js(&records)?;

    fs::write(&inputs.output, js).map_err(|source| ConsolidateError::Io {
        path: inputs.output.display().to_string(),
        source,
    })?;
    info!("Successfully wrote to {}", inputs.output.display());

    Ok(ConsolidationSummary {
        geological_coordinates,
        hydrological_coordinates,
        exact_coordinates,
        records: records.len(),
        records_with_coordinates: records.iter().filter(|r| r.lat.is_some()).count(),
    })
}
