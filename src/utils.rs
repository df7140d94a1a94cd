//! Shared text helpers for the alert scrapers

use scraper::ElementRef;

/// Title-case a string the way the site's bulletins are rendered in responses:
/// the first cased character after any non-cased character is upper-cased,
/// every other cased character is lower-cased.
///
/// # Examples
///
/// ```
/// use alerta_es_service::utils::title_case;
///
/// assert_eq!(title_case("santa maria de jetibá"), "Santa Maria De Jetibá");
/// assert_eq!(title_case("SAIDA DE SMJ"), "Saida De Smj");
/// assert_eq!(title_case("d'água"), "D'Água");
/// ```
pub fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut previous_cased = false;

    for c in value.chars() {
        let cased = c.is_uppercase() || c.is_lowercase();
        if cased && !previous_cased {
            result.extend(c.to_uppercase());
        } else if cased {
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
        previous_cased = cased;
    }

    result
}

/// Collapse every run of whitespace to a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element with each text node trimmed and the pieces
/// concatenated without a separator.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_title_case_lower_input() {
        assert_eq!(title_case("santa maria de jetibá"), "Santa Maria De Jetibá");
    }

    #[test]
    fn test_title_case_mixed_input() {
        assert_eq!(title_case("cAStelo"), "Castelo");
        assert_eq!(title_case("São Sebastião De Cima"), "São Sebastião De Cima");
    }

    #[test]
    fn test_title_case_digits_are_not_cased() {
        assert_eq!(title_case("2a rua"), "2A Rua");
    }

    #[test]
    fn test_title_case_empty() {
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  santa   maria\tde jetibá    38.4 "),
            "santa maria de jetibá 38.4"
        );
    }

    #[test]
    fn test_stripped_text_joins_trimmed_nodes() {
        let html = Html::parse_fragment("<p>  Alerta <b> laranja </b>\n para chuva </p>");
        let selector = Selector::parse("p").unwrap();
        let p = html.select(&selector).next().unwrap();
        assert_eq!(stripped_text(p), "Alertalaranjapara chuva");
    }
}
