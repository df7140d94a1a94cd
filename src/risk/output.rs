use std::collections::BTreeSet;

use serde_json::json;

use crate::risk::consolidator::{RiskRecord, RiskType};

/// Sorted, de-duplicated localities of the records.
pub fn unique_localities(records: &[RiskRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.locality.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Render the dashboard script: `window.appData` with every record and
/// `window.appConstants` with the locality list and risk labels.
pub fn render_data_js(records: &[RiskRecord]) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string_pretty(records)?;
    let constants = serde_json::to_string_pretty(&json!({
        "LOCALITIES": unique_localities(records),
        "RISKS": {
            "GEOLOGICAL": RiskType::Geological.label(),
            "HYDROLOGICAL": RiskType::Hydrological.label(),
            "BOTH": RiskType::GeologicalAndHydrological.label(),
        }
    }))?;

    Ok(format!(
        "window.appData = {data};\n\nwindow.appConstants = {constants};\n"
    ))
}
