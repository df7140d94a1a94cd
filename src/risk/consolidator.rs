use serde::Serialize;
use tracing::{debug, info};

use crate::risk::csv_loader::{HouseholdRow, PointLookups};
use crate::risk::rules::{ConsolidationRules, SectorDetails};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskType {
    #[serde(rename = "Geológico")]
    Geological,
    #[serde(rename = "Hidrológico")]
    Hydrological,
    #[serde(rename = "Geológico + Hidrológico")]
    GeologicalAndHydrological,
    #[serde(rename = "Desconhecido")]
    Unknown,
}

impl RiskType {
    pub fn classify(geological: bool, flood_prone: bool) -> Self {
        match (geological, flood_prone) {
            (true, true) => RiskType::GeologicalAndHydrological,
            (true, false) => RiskType::Geological,
            (false, true) => RiskType::Hydrological,
            (false, false) => RiskType::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskType::Geological => "Geológico",
            RiskType::Hydrological => "Hidrológico",
            RiskType::GeologicalAndHydrological => "Geológico + Hidrológico",
            RiskType::Unknown => "Desconhecido",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Muito Alta")]
    VeryHigh,
}

impl Severity {
    /// Map a free-text survey grade ("Muito Alto", "Alto", "Media", ...).
    pub fn from_grade(grade: &str) -> Self {
        let grade = grade.to_lowercase();
        if grade.contains("muito alto") || grade.contains("muito alta") {
            Severity::VeryHigh
        } else if grade.contains("alto") || grade.contains("alta") {
            Severity::High
        } else {
            Severity::Medium
        }
    }
}

/// One household in the dashboard data file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRecord {
    pub id: String,
    pub resident: String,
    pub locality: String,
    pub risk_type: RiskType,
    pub severity: Severity,
    pub full_desc: String,
    pub details: Option<SectorDetails>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Anonymous resident label built from the last four characters of the id.
pub fn resident_label(household_id: &str) -> String {
    let chars: Vec<char> = household_id.chars().collect();
    let start = chars.len().saturating_sub(4);
    let suffix: String = chars[start..].iter().collect();
    format!("Morador {suffix}")
}

/// Merge households with the point lookups. Excluded areas are dropped;
/// every other household produces exactly one record.
pub fn consolidate(
    households: Vec<HouseholdRow>,
    lookups: &PointLookups,
    rules: &ConsolidationRules,
) -> Vec<RiskRecord> {
    let mut records = Vec::with_capacity(households.len());
    let mut excluded = 0;

    for row in households {
        if rules.is_excluded_area(&row.area_name) {
            excluded += 1;
            continue;
        }

        let geological = row.is_geological();
        let flood_prone = row.is_flood_prone();
        let risk_type = RiskType::classify(geological, flood_prone);

        let mut locality = rules.default_locality.clone();
        let mut severity = Severity::Medium;
        let mut details = None;

        if geological {
            if let Some(geo) = lookups.geo_detail(&row.household_id) {
                locality = geo.locality.clone();
                severity = Severity::from_grade(&geo.grade);
                details = Some(rules.sector_details_for(&geo.sector_code, &geo.grade));
            }
        }

        if flood_prone && details.is_none() {
            if locality == rules.default_locality || locality == rules.unknown_locality {
                if let Some(hinted) = rules.hinted_locality(&row.area_name) {
                    locality = hinted.to_string();
                }
            }
            details = Some(rules.flood_details());
        }

        let coordinates = lookups.coordinates(&row.household_id);

        records.push(RiskRecord {
            resident: resident_label(&row.household_id),
            id: row.household_id,
            locality,
            risk_type,
            severity,
            full_desc: row.area_name,
            details,
            lat: coordinates.map(|c| c.lat),
            lng: coordinates.map(|c| c.lng),
        });
    }

    let with_coordinates = records.iter().filter(|r| r.lat.is_some()).count();
    debug!("Excluded {} households by area name", excluded);
    info!(
        "Processed {} records. Found coords for {} records.",
        records.len(),
        with_coordinates
    );

    records
}
