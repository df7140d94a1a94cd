use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::risk::rules::ConsolidationRules;
use crate::risk::ConsolidateError;

/// One household from the census risk table.
#[derive(Debug, Clone, Deserialize)]
pub struct HouseholdRow {
    #[serde(rename = "Numero_Moradia", default = "default_household_id")]
    pub household_id: String,
    #[serde(rename = "Nome_Area_Risco", default)]
    pub area_name: String,
    #[serde(rename = "Area_Risco_Geologico", default)]
    pub geological_flag: String,
    #[serde(rename = "Area_Suscetivel_Alagamento", default)]
    pub flood_flag: String,
}

fn default_household_id() -> String {
    "0".to_string()
}

impl HouseholdRow {
    pub fn is_geological(&self) -> bool {
        is_yes(&self.geological_flag)
    }

    pub fn is_flood_prone(&self) -> bool {
        is_yes(&self.flood_flag)
    }
}

fn is_yes(flag: &str) -> bool {
    flag.trim().to_lowercase() == "sim"
}

/// One georeferenced point from a geological, hydrological or exact export.
#[derive(Debug, Clone, Deserialize)]
pub struct PointRow {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default = "default_point_locality")]
    pub localidade: String,
    #[serde(default)]
    pub setor_risco: String,
    #[serde(default)]
    pub grau_risco: Option<String>,
}

fn default_point_locality() -> String {
    "Desconhecido".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Geological survey attributes of a household.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoDetail {
    pub locality: String,
    pub sector_code: String,
    pub grade: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSource {
    Geological,
    Hydrological,
    Exact,
}

/// Coordinates and geological details keyed by household identifier.
#[derive(Debug, Clone, Default)]
pub struct PointLookups {
    coordinates: HashMap<String, Coordinates>,
    geo_details: HashMap<String, GeoDetail>,
}

/// Parse a coordinate written with either `.` or `,` as decimal separator.
pub fn parse_coordinate(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.replace(',', ".").parse::<f64>().ok()
}

impl PointLookups {
    pub fn coordinates(&self, household_id: &str) -> Option<Coordinates> {
        self.coordinates.get(household_id).copied()
    }

    pub fn geo_detail(&self, household_id: &str) -> Option<&GeoDetail> {
        self.geo_details.get(household_id)
    }

    pub fn coordinate_count(&self) -> usize {
        self.coordinates.len()
    }

    /// Merge one export into the lookups. Later sources overwrite the
    /// coordinates of earlier ones. Returns how many coordinates were stored.
    pub fn add_points(
        &mut self,
        rows: Vec<PointRow>,
        source: PointSource,
        rules: &ConsolidationRules,
    ) -> usize {
        let mut stored = 0;
        let mut excluded = 0;

        for row in rows {
            let id = row.id.trim();
            if id.is_empty() {
                continue;
            }

            let locality = if row.localidade.is_empty() {
                String::new()
            } else {
                rules.normalize_locality(&row.localidade)
            };

            if source == PointSource::Geological && rules.is_excluded_point(&locality) {
                excluded += 1;
                continue;
            }

            match (parse_coordinate(&row.lat), parse_coordinate(&row.lon)) {
                (Some(lat), Some(lng)) => {
                    self.coordinates.insert(id.to_string(), Coordinates { lat, lng });
                    stored += 1;
                }
                (None, None) if row.lat.trim().is_empty() && row.lon.trim().is_empty() => {}
                _ => warn!(
                    "Unparseable coordinates for point {}: lat='{}', lon='{}'",
                    id, row.lat, row.lon
                ),
            }

            if source == PointSource::Geological {
                self.geo_details.insert(
                    id.to_string(),
                    GeoDetail {
                        locality,
                        sector_code: row.setor_risco,
                        grade: row
                            .grau_risco
                            .unwrap_or_else(|| rules.default_grade.clone()),
                    },
                );
            }
        }

        debug!(
            "{:?} points: {} coordinates stored, {} excluded",
            source, stored, excluded
        );
        stored
    }
}

/// Parse semicolon-delimited rows, tolerating a BOM and short rows. Rows that
/// fail to deserialize are skipped.
pub fn parse_csv_rows<T: DeserializeOwned>(content: &str) -> Result<Vec<T>, ConsolidateError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(content.as_bytes());
    let headers = reader.headers()?.clone();
    debug!("CSV columns: {:?}", headers);

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("Skipping unreadable CSV row {}: {}", idx + 1, e),
        }
    }

    Ok(rows)
}

/// Read a CSV file, replacing invalid UTF-8 sequences.
pub fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ConsolidateError> {
    let bytes = fs::read(path).map_err(|source| ConsolidateError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    let rows = parse_csv_rows(&content)?;
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load a point export into the lookups. A missing or unreadable file is
/// reported and contributes nothing.
pub fn load_points(
    lookups: &mut PointLookups,
    path: &Path,
    source: PointSource,
    rules: &ConsolidationRules,
) -> usize {
    match read_csv_rows::<PointRow>(path) {
        Ok(rows) => lookups.add_points(rows, source, rules),
        Err(e) => {
            warn!("Warning reading {}: {}", path.display(), e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GEO_CSV: &str = "\u{feff}id;localidade;lat;lon;setor_risco;grau_risco;area_risco
101;CÓRREGO DO MEIL;-20,0512;-40,7421;ES_SM_SR_01_CPRM;Muito Alto;Área 1
102;saida de smj;-20.1;-40.7;ES_SM_SR_02_CPRM;Alto;Área 2
103;Caramuru;;;ES_SM_SR_03_CPRM;;Área 3
;Sem id;-20.0;-40.0;;;
";

    #[test]
    fn test_parse_coordinate_separators() {
        assert_eq!(parse_coordinate("-20,0512"), Some(-20.0512));
        assert_eq!(parse_coordinate(" -40.7 "), Some(-40.7));
        assert_eq!(parse_coordinate(""), None);
        assert_eq!(parse_coordinate("n/a"), None);
    }

    #[test]
    fn test_parse_rows_strips_bom() {
        let rows: Vec<PointRow> = parse_csv_rows(GEO_CSV).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].id, "101");
    }

    #[test]
    fn test_geological_points_fill_details_and_skip_exclusions() {
        let rules = ConsolidationRules::default();
        let mut lookups = PointLookups::default();
        let rows = parse_csv_rows(GEO_CSV).unwrap();

        let stored = lookups.add_points(rows, PointSource::Geological, &rules);

        assert_eq!(stored, 1);
        assert_eq!(
            lookups.coordinates("101"),
            Some(Coordinates {
                lat: -20.0512,
                lng: -40.7421
            })
        );
        assert_eq!(lookups.geo_detail("101").unwrap().locality, "Córrego Do Meio");
        assert!(lookups.geo_detail("102").is_none());
        assert!(lookups.coordinates("102").is_none());

        let without_coords = lookups.geo_detail("103").unwrap();
        assert_eq!(without_coords.grade, "Media");
        assert!(lookups.coordinates("103").is_none());
    }

    #[test]
    fn test_later_sources_overwrite_coordinates() {
        let rules = ConsolidationRules::default();
        let mut lookups = PointLookups::default();

        let hydro = parse_csv_rows("id;lat;lon\n7;-20.0;-40.0\n").unwrap();
        let exact = parse_csv_rows("id;lat;lon\n7;-20.5;-40.5\n").unwrap();
        lookups.add_points(hydro, PointSource::Hydrological, &rules);
        lookups.add_points(exact, PointSource::Exact, &rules);

        assert_eq!(lookups.coordinate_count(), 1);
        assert_eq!(lookups.coordinates("7").unwrap().lat, -20.5);
        assert!(lookups.geo_detail("7").is_none());
    }

    #[test]
    fn test_household_flags() {
        let rows: Vec<HouseholdRow> = parse_csv_rows(
            "Numero_Moradia;Nome_Area_Risco;Area_Risco_Geologico;Area_Suscetivel_Alagamento\n\
             3201000123;Área Centro;SIM;Não\n",
        )
        .unwrap();

        assert!(rows[0].is_geological());
        assert!(!rows[0].is_flood_prone());
    }

    #[test]
    fn test_missing_household_id_column_defaults_to_zero() {
        let rows: Vec<HouseholdRow> = parse_csv_rows("Nome_Area_Risco\nÁrea X\n").unwrap();
        assert_eq!(rows[0].household_id, "0");
    }

    #[test]
    fn test_missing_point_file_contributes_nothing() {
        let rules = ConsolidationRules::default();
        let mut lookups = PointLookups::default();
        let stored = load_points(
            &mut lookups,
            Path::new("/nonexistent/pontos.csv"),
            PointSource::Exact,
            &rules,
        );
        assert_eq!(stored, 0);
    }
}
