use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::utils::stripped_text;

/// Blocks shorter than this are navigation or labels, not alerts.
const MIN_ALERT_CHARS: usize = 30;

/// Main content region candidates, tried in order.
const MAIN_REGION_SELECTORS: &[&str] = &["main", "div.layout-content", "article", "body"];

const TEXT_BLOCK_SELECTOR: &str = "h3, h4, p, li, article";

/// Filters applied to the alert listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlertFilter {
    pub serrana: bool,
    pub termo: Option<String>,
}

fn main_region(document: &Html) -> Option<ElementRef<'_>> {
    MAIN_REGION_SELECTORS.iter().find_map(|css| {
        let selector = Selector::parse(css).expect("static selector");
        document.select(&selector).next()
    })
}

fn contains_any(haystack_lower: &str, needles: &[&str]) -> bool {
    needles
        .iter()
        .any(|needle| haystack_lower.contains(&needle.to_lowercase()))
}

/// Extract alert text blocks from the listing page in document order.
///
/// `boilerplate` phrases drop a block wherever they appear in it.
/// `serrana_municipalities` is consulted only when `filter.serrana` is set.
#[instrument(skip(html, boilerplate, serrana_municipalities), fields(html_size = html.len()))]
pub fn extract_alerts(
    html: &str,
    filter: &AlertFilter,
    boilerplate: &[&str],
    serrana_municipalities: &[&str],
) -> Vec<String> {
    let document = Html::parse_document(html);
    let Some(region) = main_region(&document) else {
        debug!("No content region found");
        return Vec::new();
    };
    debug!("Using content region <{}>", region.value().name());

    let block_selector = Selector::parse(TEXT_BLOCK_SELECTOR).expect("static selector");
    let term = filter
        .termo
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut alerts: Vec<String> = Vec::new();

    for element in region.select(&block_selector) {
        if element.id() == region.id() {
            continue;
        }

        let text = stripped_text(element);
        if text.chars().count() < MIN_ALERT_CHARS {
            continue;
        }

        let lower = text.to_lowercase();
        if contains_any(&lower, boilerplate) || alerts.contains(&text) {
            continue;
        }

        if filter.serrana && !contains_any(&lower, serrana_municipalities) {
            continue;
        }
        if let Some(term) = &term {
            if !lower.contains(term.as_str()) {
                continue;
            }
        }

        alerts.push(text);
    }

    debug!("Extracted {} alert blocks", alerts.len());
    alerts
}
