use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::bulletin_links::{extract_bulletin_links, filter_bulletins, BulletinKind, BulletinLink};
use crate::classifier::{BulletinClassifier, BulletinDigest};
use crate::fetch_error::FetchError;
use crate::fetcher::AlertaClient;
use crate::pdf_text::{join_pages, PageSource, PdfLoader};

pub const SUCCESS_STATUS: &str = "Sucesso";

#[derive(Error, Debug)]
pub enum BulletinError {
    #[error("Erro ao extrair dados da página: {0}")]
    Listing(FetchError),

    #[error("Nenhum boletim encontrado no site.")]
    NotFound,

    #[error("Erro ao baixar o PDF. {0}")]
    Download(FetchError),

    #[error("Erro no processamento do PDF: {0}")]
    Processing(FetchError),
}

// Query parameters of the bulletin listing endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulletinQuery {
    pub limite: Option<usize>,
    pub ano: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulletinListResponse {
    pub fonte: String,
    pub total_encontrado: usize,
    pub boletins: Vec<BulletinLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SerranaBulletinResponse {
    pub boletim_lido: String,
    pub url_oficial: String,
    pub status: String,
    pub chuvas_regiao_serrana: Vec<String>,
    pub extratos_regiao_serrana: Vec<String>,
}

impl SerranaBulletinResponse {
    pub fn from_digest(link: BulletinLink, digest: BulletinDigest) -> Self {
        Self {
            boletim_lido: link.title,
            url_oficial: link.pdf_url,
            status: SUCCESS_STATUS.to_string(),
            chuvas_regiao_serrana: digest.rainfall.iter().map(ToString::to_string).collect(),
            extratos_regiao_serrana: digest.excerpts,
        }
    }
}

#[derive(Clone)]
pub struct BulletinService {
    client: AlertaClient,
    loader: Arc<dyn PdfLoader>,
    classifier: BulletinClassifier,
}

impl BulletinService {
    pub fn new(
        client: AlertaClient,
        loader: Arc<dyn PdfLoader>,
        classifier: BulletinClassifier,
    ) -> Self {
        Self {
            client,
            loader,
            classifier,
        }
    }

    /// Scrape every PDF link from one of the bulletin listings.
    #[instrument(skip(self))]
    pub async fn fetch_links(&self, kind: BulletinKind) -> Result<Vec<BulletinLink>, FetchError> {
        let url = self.client.page_url(kind.path());
        let html = self.client.fetch_page(&url).await?;
        Ok(extract_bulletin_links(&html, self.client.base_url()))
    }

    /// Listing endpoint body: links filtered by year, then truncated.
    #[instrument(skip(self))]
    pub async fn list_bulletins(
        &self,
        kind: BulletinKind,
        query: &BulletinQuery,
    ) -> Result<BulletinListResponse, FetchError> {
        let links = self.fetch_links(kind).await?;
        let total_links = links.len();
        let boletins = filter_bulletins(links, query.ano.as_deref(), query.limite);

        info!(
            "Returning {} of {} bulletin links for {:?}",
            boletins.len(),
            total_links,
            kind
        );

        Ok(BulletinListResponse {
            fonte: self.client.page_url(kind.path()),
            total_encontrado: boletins.len(),
            boletins,
        })
    }

    /// Download the most recent bulletin of a listing and extract its pages.
    #[instrument(skip(self))]
    pub async fn latest_bulletin_pages(
        &self,
        kind: BulletinKind,
    ) -> Result<(BulletinLink, Box<dyn PageSource + Send>), BulletinError> {
        let link = self
            .fetch_links(kind)
            .await
            .map_err(BulletinError::Listing)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                warn!("No bulletin links found for {:?}", kind);
                BulletinError::NotFound
            })?;
        debug!("Most recent bulletin: {} ({})", link.title, link.pdf_url);

        let bytes = self
            .client
            .fetch_pdf(&link.pdf_url)
            .await
            .map_err(BulletinError::Download)?;

        // pdf-extract is CPU bound
        let loader = Arc::clone(&self.loader);
        let pages = tokio::task::spawn_blocking(move || loader.load(&bytes))
            .await
            .map_err(|e| BulletinError::Processing(FetchError::PdfExtraction(e.to_string())))?
            .map_err(BulletinError::Processing)?;

        Ok((link, pages))
    }

    /// Read the latest extraordinary bulletin and classify its lines for the
    /// target localities.
    #[instrument(skip(self))]
    pub async fn latest_serrana_digest(&self) -> Result<SerranaBulletinResponse, BulletinError> {
        let (link, pages) = self.latest_bulletin_pages(BulletinKind::Extraordinary).await?;
        let text = join_pages(&*pages);

        let digest = self.classifier.classify(&text);
        info!(
            "Bulletin '{}': {} rainfall rows, {} excerpts",
            link.title,
            digest.rainfall.len(),
            digest.excerpts.len()
        );

        Ok(SerranaBulletinResponse::from_digest(link, digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::RainfallRecord;

    #[test]
    fn test_response_from_digest() {
        let link = BulletinLink {
            title: "Boletim Extraordinário 05".to_string(),
            pdf_url: "https://alerta.es.gov.br/b5.pdf".to_string(),
        };
        let digest = BulletinDigest {
            rainfall: vec![RainfallRecord {
                locality: "Santa Maria De Jetibá".to_string(),
                volume_mm: "38.4".to_string(),
            }],
            excerpts: vec!["Chuva forte em Santa Maria de Jetibá".to_string()],
        };

        let response = SerranaBulletinResponse::from_digest(link, digest);
        assert_eq!(response.boletim_lido, "Boletim Extraordinário 05");
        assert_eq!(response.url_oficial, "https://alerta.es.gov.br/b5.pdf");
        assert_eq!(response.status, "Sucesso");
        assert_eq!(response.chuvas_regiao_serrana, vec!["Santa Maria De Jetibá: 38.4 mm"]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BulletinError::NotFound.to_string(),
            "Nenhum boletim encontrado no site."
        );
        let err = BulletinError::Processing(FetchError::PdfExtraction("bad xref".to_string()));
        assert_eq!(
            err.to_string(),
            "Erro no processamento do PDF: Failed to extract text from PDF: bad xref"
        );
    }
}
