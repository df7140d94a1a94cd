//! Hand-maintained data for the Santa Maria de Jetibá risk-area exports.
//!
//! Everything here is data: the consolidator only looks values up. Another
//! municipality can supply its own table as JSON (`--rules`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::utils::title_case;

/// Sector attributes from the CPRM sector survey. Absent fields are omitted
/// from the generated data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SectorDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_setor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_setor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipologia: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situacao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grau_risco: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sug_interv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgao_exec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projeto: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypoFix {
    pub find: String,
    pub replace: String,
}

/// Locality assigned to a flood-prone household whose area name mentions any
/// of `patterns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalityHint {
    pub patterns: Vec<String>,
    pub locality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationRules {
    /// Applied to title-cased point localities.
    pub typo_fixes: Vec<TypoFix>,
    /// Geological points whose (normalized) locality contains one of these are dropped.
    pub excluded_point_localities: Vec<String>,
    /// Households whose raw area name contains one of these are dropped.
    pub excluded_area_names: Vec<String>,
    pub locality_hints: Vec<LocalityHint>,
    pub sector_details: HashMap<String, SectorDetails>,
    pub default_locality: String,
    pub unknown_locality: String,
    pub default_grade: String,
    pub unmapped_sector_description: String,
    pub flood_description: String,
    pub flood_agency: String,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn hint(patterns: &[&str], locality: &str) -> LocalityHint {
    LocalityHint {
        patterns: owned(patterns),
        locality: locality.to_string(),
    }
}

impl Default for ConsolidationRules {
    fn default() -> Self {
        let mut sector_details = HashMap::new();
        sector_details.insert(
            "ES_SM_SR_01_CPRM".to_string(),
            SectorDetails {
                data_setor: Some("01/01/2012".to_string()),
                num_setor: Some("ES_SM_SR_01_CPRM".to_string()),
                tipologia: Some("Escorregamento Planar".to_string()),
                situacao: Some(String::new()),
                descricao: Some("Deslizamento planar, em razão da execução de taludes cortes muito altos e verticalizados, que atingem horizontes de solos geotecnicamente problemáticos em solos argilosos muito pouco permeáveis.".to_string()),
                grau_risco: Some("Muito Alto".to_string()),
                sug_interv: Some("Preservação da mata natural/Obras de contenção e retaludamento/Não permitir o adensamento urbano do local/Palestras ambientais/Formação de líderes comunitários/Em caso de chuva intensa, é recomendável a saída dos moradores da área".to_string()),
                orgao_exec: Some("CPRM".to_string()),
                projeto: Some("Ação Emergencial Para Reconhecimento De Áreas De Alto E Muito Alto Risco A Movimentos De Massas E Enchentes".to_string()),
            },
        );

        Self {
            typo_fixes: vec![TypoFix {
                find: "Meil".to_string(),
                replace: "Meio".to_string(),
            }],
            excluded_point_localities: owned(&[
                "Saida De Smj",
                "Sao Sebastiao De Cima",
                "São Sebastião De Cima",
            ]),
            excluded_area_names: owned(&["SAIDA DE SMJ", "SAO SEBASTIÃO DE CIMA"]),
            locality_hints: vec![
                hint(&["Rio Possmoser"], "Alto Rio Possmoser"),
                hint(&["Vila Roos"], "Bairro Vila Roos"),
                hint(&["São Luis", "São Luís"], "Bairro São Luis"),
                hint(&["Vila Jetibá"], "Bairro Vila Jetibá"),
                hint(&["Centro"], "Centro"),
            ],
            sector_details,
            default_locality: "Área Urbana".to_string(),
            unknown_locality: "Desconhecido".to_string(),
            default_grade: "Media".to_string(),
            unmapped_sector_description: "Verificar estudo detalhado para este setor.".to_string(),
            flood_description: "Suscetibilidade Alta a Inundação - CPRM".to_string(),
            flood_agency: "CPRM".to_string(),
        }
    }
}

impl ConsolidationRules {
    /// Title-case a point locality and apply the typo table.
    pub fn normalize_locality(&self, raw: &str) -> String {
        let mut locality = title_case(raw).trim().to_string();
        for fix in &self.typo_fixes {
            if locality.contains(&fix.find) {
                locality = locality.replace(&fix.find, &fix.replace);
            }
        }
        locality
    }

    pub fn is_excluded_point(&self, normalized_locality: &str) -> bool {
        self.excluded_point_localities
            .iter()
            .any(|name| normalized_locality.contains(name.as_str()))
    }

    pub fn is_excluded_area(&self, area_name: &str) -> bool {
        self.excluded_area_names
            .iter()
            .any(|name| area_name.contains(name.as_str()))
    }

    /// First hint whose pattern appears in the area name.
    pub fn hinted_locality(&self, area_name: &str) -> Option<&str> {
        self.locality_hints
            .iter()
            .find(|hint| hint.patterns.iter().any(|p| area_name.contains(p.as_str())))
            .map(|hint| hint.locality.as_str())
    }

    /// Details of a surveyed sector, or a pointer to the detailed study when
    /// the sector is not in the table.
    pub fn sector_details_for(&self, sector_code: &str, grade: &str) -> SectorDetails {
        self.sector_details
            .get(sector_code)
            .cloned()
            .unwrap_or_else(|| SectorDetails {
                num_setor: Some(sector_code.to_string()),
                grau_risco: Some(grade.to_string()),
                descricao: Some(self.unmapped_sector_description.clone()),
                ..SectorDetails::default()
            })
    }

    pub fn flood_details(&self) -> SectorDetails {
        SectorDetails {
            descricao: Some(self.flood_description.clone()),
            orgao_exec: Some(self.flood_agency.clone()),
            ..SectorDetails::default()
        }
    }
}
