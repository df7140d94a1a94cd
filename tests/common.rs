// Shared fixtures for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use alerta_es_service::api::AppState;
use alerta_es_service::classifier::BulletinClassifier;
use alerta_es_service::config::Config;
use alerta_es_service::fetch_error::FetchError;
use alerta_es_service::fetcher::AlertaClient;
use alerta_es_service::pdf_text::{PageSource, PdfLoader, StaticPages};
use alerta_es_service::services::{AlertService, BulletinService};

/// Loader that ignores the downloaded bytes and returns canned pages.
pub struct FakePdfLoader {
    pub pages: Vec<Option<String>>,
}

impl PdfLoader for FakePdfLoader {
    fn load(&self, _bytes: &[u8]) -> Result<Box<dyn PageSource + Send>, FetchError> {
        Ok(Box::new(StaticPages(self.pages.clone())))
    }
}

/// Loader that rejects every download as an unreadable PDF.
pub struct FailingPdfLoader;

impl PdfLoader for FailingPdfLoader {
    fn load(&self, _bytes: &[u8]) -> Result<Box<dyn PageSource + Send>, FetchError> {
        Err(FetchError::PdfExtraction("invalid xref table".to_string()))
    }
}

/// App state pointing every scraper at `base_url`.
pub fn test_state(base_url: &str, pages: Vec<Option<String>>) -> AppState {
    test_state_with_loader(base_url, Arc::new(FakePdfLoader { pages }))
}

pub fn test_state_with_loader(base_url: &str, loader: Arc<dyn PdfLoader>) -> AppState {
    let config = Config::with_base_url(base_url);
    let client = AlertaClient::new(&config).expect("Failed to build client");

    AppState {
        alert_service: AlertService::new(client.clone()),
        bulletin_service: BulletinService::new(
            client,
            loader,
            BulletinClassifier::new(config.target_localities.as_slice()),
        ),
    }
}

pub const ALERTS_HTML: &str = r#"
<html><body>
  <header><p>Governo do Estado do Espírito Santo - Defesa Civil Estadual</p></header>
  <main>
    <h3>ALERTAS VIGENTES</h3>
    <p>Alerta laranja de chuvas intensas para Santa Maria de Jetibá até amanhã.</p>
    <p>Alerta amarelo de ventos fortes para o litoral sul do estado.</p>
    <p>O sistema de envio de SMS é gratuito para todos os cidadãos cadastrados.</p>
  </main>
</body></html>
"#;

pub const EXTRAORDINARY_LISTING_HTML: &str = r#"
<html><body>
  <div class="view-content">
    <a href="/files/boletim-extraordinario-2025-03.pdf">Boletim Extraordinário 03/2025</a>
    <a href="/files/boletim-extraordinario-2025-03.pdf">Baixar</a>
    <a href="/files/boletim-extraordinario-2024-12.pdf">Boletim Extraordinário 12/2024</a>
    <a href="/files/boletim-extraordinario-2025-01.pdf">Boletim Extraordinário 01/2025</a>
    <a href="/contato">Contato</a>
  </div>
</body></html>
"#;
