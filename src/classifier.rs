use std::collections::HashSet;
use std::fmt;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::utils::{collapse_whitespace, title_case};

/// Excerpt returned when a bulletin mentions none of the target localities.
pub const NO_INFORMATION_MESSAGE: &str = "O documento atual não possui informações específicas citadas ou a situação encontra-se normalizada.";

/// A rainfall table row: locality followed by the measured volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainfallRecord {
    pub locality: String,
    /// Raw captured token, decimal separator preserved.
    pub volume_mm: String,
}

impl fmt::Display for RainfallRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} mm", self.locality, self.volume_mm)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulletinDigest {
    pub rainfall: Vec<RainfallRecord>,
    pub excerpts: Vec<String>,
}

/// Splits bulletin text into rainfall rows and prose excerpts for a fixed
/// set of localities.
#[derive(Debug, Clone)]
pub struct BulletinClassifier {
    localities: Vec<String>,
    rainfall_pattern: Option<Regex>,
}

impl BulletinClassifier {
    /// Build a classifier for lower-case locality names. Alternation follows
    /// the given order.
    pub fn new<S: AsRef<str>>(localities: &[S]) -> Self {
        let localities: Vec<String> = localities
            .iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .collect();

        let rainfall_pattern = if localities.is_empty() {
            None
        } else {
            let alternation = localities
                .iter()
                .map(|l| regex::escape(l))
                .collect::<Vec<_>>()
                .join("|");
            // Escaped literals joined by `|` always compile.
            Regex::new(&format!(r"({alternation})\s+(\d+[.,]?\d*)$")).ok()
        };

        Self {
            localities,
            rainfall_pattern,
        }
    }

    pub fn localities(&self) -> &[String] {
        &self.localities
    }

    /// Whether a normalized (lower-cased, whitespace-collapsed) line mentions
    /// any target locality.
    pub fn is_relevant(&self, normalized: &str) -> bool {
        self.localities.iter().any(|l| normalized.contains(l.as_str()))
    }

    /// Lower-case, trim and collapse internal whitespace.
    pub fn normalize_line(line: &str) -> String {
        collapse_whitespace(&line.trim().to_lowercase())
    }

    fn match_rainfall(&self, normalized: &str) -> Option<RainfallRecord> {
        let captures = self.rainfall_pattern.as_ref()?.captures(normalized)?;
        Some(RainfallRecord {
            locality: title_case(&captures[1]),
            volume_mm: captures[2].to_string(),
        })
    }

    #[instrument(skip(self, text), fields(text_size = text.len()))]
    pub fn classify(&self, text: &str) -> BulletinDigest {
        let mut rainfall = Vec::new();
        let mut excerpts = Vec::new();
        let mut seen_excerpts = HashSet::new();

        for line in text.lines() {
            let normalized = Self::normalize_line(line);
            if !self.is_relevant(&normalized) {
                continue;
            }

            if let Some(record) = self.match_rainfall(&normalized) {
                debug!("Rainfall row: {}", record);
                rainfall.push(record);
                continue;
            }

            let excerpt = line.trim();
            if excerpt.chars().count() > 3 && seen_excerpts.insert(excerpt.to_string()) {
                excerpts.push(excerpt.to_string());
            }
        }

        if rainfall.is_empty() && excerpts.is_empty() {
            debug!("No locality mentions found in bulletin text");
            excerpts.push(NO_INFORMATION_MESSAGE.to_string());
        }

        debug!(
            "Classified {} rainfall rows and {} excerpts",
            rainfall.len(),
            excerpts.len()
        );

        BulletinDigest { rainfall, excerpts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> BulletinClassifier {
        BulletinClassifier::new(&["santa maria de jetibá"])
    }

    #[test]
    fn test_rainfall_row_with_ragged_spacing() {
        let digest = classifier().classify("  Santa Maria de Jetibá    38.4");

        assert_eq!(
            digest.rainfall,
            vec![RainfallRecord {
                locality: "Santa Maria De Jetibá".to_string(),
                volume_mm: "38.4".to_string(),
            }]
        );
        assert!(digest.excerpts.is_empty());
    }

    #[test]
    fn test_comma_decimal_and_integer_volumes() {
        let text = "SANTA MARIA DE JETIBÁ 12,7\nsanta maria de jetibá\t\t5";
        let digest = classifier().classify(text);

        let volumes: Vec<_> = digest.rainfall.iter().map(|r| r.volume_mm.as_str()).collect();
        assert_eq!(volumes, vec!["12,7", "5"]);
    }

    #[test]
    fn test_irrelevant_line_excluded_from_both_lists() {
        let text = "Situação normalizada na região\nChuva em Santa Maria de Jetibá durante a tarde";
        let digest = classifier().classify(text);

        assert!(digest.rainfall.is_empty());
        assert_eq!(
            digest.excerpts,
            vec!["Chuva em Santa Maria de Jetibá durante a tarde".to_string()]
        );
    }

    #[test]
    fn test_no_locality_yields_sentinel() {
        let digest = classifier().classify("Boletim Extraordinário\nSem ocorrências\n");

        assert!(digest.rainfall.is_empty());
        assert_eq!(digest.excerpts, vec![NO_INFORMATION_MESSAGE.to_string()]);
    }

    #[test]
    fn test_empty_text_yields_sentinel() {
        let digest = classifier().classify("");
        assert_eq!(digest.excerpts, vec![NO_INFORMATION_MESSAGE.to_string()]);
    }

    #[test]
    fn test_excerpts_deduplicated() {
        let text = "Alerta para Santa Maria de Jetibá\n  Alerta para Santa Maria de Jetibá  \nAlerta para Santa Maria de Jetibá";
        let digest = classifier().classify(text);

        assert_eq!(digest.excerpts, vec!["Alerta para Santa Maria de Jetibá".to_string()]);
    }

    #[test]
    fn test_number_not_at_end_is_excerpt() {
        let digest = classifier().classify("Santa Maria de Jetibá 38.4 mm acumulados");

        assert!(digest.rainfall.is_empty());
        assert_eq!(digest.excerpts, vec!["Santa Maria de Jetibá 38.4 mm acumulados".to_string()]);
    }

    #[test]
    fn test_thousands_separator_falls_back_to_excerpt() {
        let digest = classifier().classify("Santa Maria de Jetibá 1.234,5");

        assert!(digest.rainfall.is_empty());
        assert_eq!(digest.excerpts, vec!["Santa Maria de Jetibá 1.234,5".to_string()]);
    }

    #[test]
    fn test_leftmost_match_wins_over_list_order() {
        let classifier = BulletinClassifier::new(&["castelo", "conceição do castelo"]);
        let digest = classifier.classify("Conceição do Castelo 20.0");

        // Leftmost match starts at "conceição", so the longer name is captured.
        assert_eq!(digest.rainfall[0].locality, "Conceição Do Castelo");
    }

    #[test]
    fn test_display_format() {
        let record = RainfallRecord {
            locality: "Santa Maria De Jetibá".to_string(),
            volume_mm: "38.4".to_string(),
        };
        assert_eq!(record.to_string(), "Santa Maria De Jetibá: 38.4 mm");
    }

    #[test]
    fn test_empty_locality_list_matches_nothing() {
        let classifier = BulletinClassifier::new::<&str>(&[]);
        let digest = classifier.classify("Santa Maria de Jetibá 38.4");

        assert!(digest.rainfall.is_empty());
        assert_eq!(digest.excerpts, vec![NO_INFORMATION_MESSAGE.to_string()]);
    }
}
