use std::collections::HashSet;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::regions::{EXTRAORDINARY_BULLETIN_PATH, METEOROLOGICAL_BULLETIN_PATH};
use crate::utils::stripped_text;

/// Label of the generic download buttons that sit next to the real bulletin
/// title and point at the same PDF.
const DOWNLOAD_LABEL: &str = "baixar";

/// A PDF bulletin link found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BulletinLink {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "url_pdf")]
    pub pdf_url: String,
}

/// The two bulletin listings published by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletinKind {
    Meteorological,
    Extraordinary,
}

impl BulletinKind {
    pub fn path(&self) -> &'static str {
        match self {
            BulletinKind::Meteorological => METEOROLOGICAL_BULLETIN_PATH,
            BulletinKind::Extraordinary => EXTRAORDINARY_BULLETIN_PATH,
        }
    }
}

/// Resolve an href against the site origin. Anything already starting with
/// `http` is taken as absolute.
pub fn resolve_link(href: &str, base_origin: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    let base = base_origin.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{base}{href}")
    } else {
        format!("{base}/{href}")
    }
}

/// Collect PDF links from a listing page in document order.
///
/// Anchors with an empty label or the generic download label are skipped,
/// and a URL seen once is never emitted again.
#[instrument(skip(html), fields(html_size = html.len()))]
pub fn extract_bulletin_links(html: &str, base_origin: &str) -> Vec<BulletinLink> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").expect("static selector");

    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.to_lowercase().contains(".pdf") {
            continue;
        }

        let title = stripped_text(anchor);
        if title.is_empty() || title.to_lowercase() == DOWNLOAD_LABEL {
            debug!("Skipping unlabeled PDF anchor: {}", href);
            continue;
        }

        let pdf_url = resolve_link(href, base_origin);
        if seen.insert(pdf_url.clone()) {
            links.push(BulletinLink { title, pdf_url });
        }
    }

    debug!("Found {} bulletin links", links.len());
    links
}

/// Keep links whose title or URL contains `year`, then keep the first `limit`.
/// A missing or zero limit keeps everything.
pub fn filter_bulletins(
    links: Vec<BulletinLink>,
    year: Option<&str>,
    limit: Option<usize>,
) -> Vec<BulletinLink> {
    let mut links: Vec<BulletinLink> = match year.filter(|y| !y.is_empty()) {
        Some(year) => links
            .into_iter()
            .filter(|link| link.title.contains(year) || link.pdf_url.contains(year))
            .collect(),
        None => links,
    };

    if let Some(limit) = limit.filter(|l| *l > 0) {
        links.truncate(limit);
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://alerta.es.gov.br";

    fn link(title: &str, pdf_url: &str) -> BulletinLink {
        BulletinLink {
            title: title.to_string(),
            pdf_url: pdf_url.to_string(),
        }
    }

    #[test]
    fn test_no_pdf_anchors_yields_empty() {
        let html = r#"
            <html><body>
              <a href="/alertas">Alertas</a>
              <a href="https://example.com/page.html">Página</a>
              <a>Sem destino</a>
            </body></html>
        "#;

        assert!(extract_bulletin_links(html, BASE).is_empty());
    }

    #[test]
    fn test_relative_link_resolves_against_origin() {
        let html = r#"<a href="/docs/x.pdf">Boletim 01/2025</a>"#;

        let links = extract_bulletin_links(html, BASE);
        assert_eq!(links, vec![link("Boletim 01/2025", "https://alerta.es.gov.br/docs/x.pdf")]);
    }

    #[test]
    fn test_absolute_link_kept_as_is() {
        let html = r#"<a href="https://cdn.es.gov.br/files/B.PDF">Boletim</a>"#;

        let links = extract_bulletin_links(html, BASE);
        assert_eq!(links[0].pdf_url, "https://cdn.es.gov.br/files/B.PDF");
    }

    #[test]
    fn test_duplicate_urls_keep_first() {
        let html = r#"
            <a href="/docs/a.pdf">Boletim A</a>
            <a href="https://alerta.es.gov.br/docs/a.pdf">Boletim A (cópia)</a>
            <a href="/docs/b.pdf">Boletim B</a>
        "#;

        let links = extract_bulletin_links(html, BASE);
        assert_eq!(
            links,
            vec![
                link("Boletim A", "https://alerta.es.gov.br/docs/a.pdf"),
                link("Boletim B", "https://alerta.es.gov.br/docs/b.pdf"),
            ]
        );
    }

    #[test]
    fn test_download_buttons_and_empty_labels_skipped() {
        let html = r#"
            <a href="/docs/a.pdf"><img src="icon.png"></a>
            <a href="/docs/a.pdf"> BAIXAR </a>
            <a href="/docs/a.pdf"><span>Boletim</span> <span>Extraordinário 12</span></a>
        "#;

        let links = extract_bulletin_links(html, BASE);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].title, "BoletimExtraordinário 12");
    }

    #[test]
    fn test_resolve_link_without_leading_slash() {
        assert_eq!(resolve_link("docs/x.pdf", "https://alerta.es.gov.br/"), "https://alerta.es.gov.br/docs/x.pdf");
    }

    #[test]
    fn test_filter_by_year_then_limit() {
        let links = vec![
            link("Boletim 2024-10", "https://a/1.pdf"),
            link("Boletim 10", "https://a/2025/2.pdf"),
            link("Boletim 2025-01", "https://a/3.pdf"),
            link("Boletim 2025-02", "https://a/4.pdf"),
        ];

        let filtered = filter_bulletins(links, Some("2025"), Some(2));
        assert_eq!(
            filtered,
            vec![
                link("Boletim 10", "https://a/2025/2.pdf"),
                link("Boletim 2025-01", "https://a/3.pdf"),
            ]
        );
    }

    #[test]
    fn test_filter_zero_limit_keeps_all() {
        let links = vec![link("A", "https://a/1.pdf"), link("B", "https://a/2.pdf")];
        assert_eq!(filter_bulletins(links.clone(), None, Some(0)), links);
        assert_eq!(filter_bulletins(links.clone(), Some(""), None), links);
    }

    #[test]
    fn test_kind_paths() {
        assert_eq!(BulletinKind::Meteorological.path(), "/boletim-meteorologico");
        assert_eq!(
            BulletinKind::Extraordinary.path(),
            "/boletim-extraordinario-de-defesa-civil"
        );
    }
}
