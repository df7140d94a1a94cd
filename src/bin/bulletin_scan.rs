use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alerta_es_service::bulletin_links::BulletinKind;
use alerta_es_service::classifier::BulletinClassifier;
use alerta_es_service::config::{Config, DEFAULT_BASE_URL};
use alerta_es_service::fetcher::AlertaClient;
use alerta_es_service::pdf_text::{scan_pages, PdfExtractLoader};
use alerta_es_service::regions::SERRANA_MUNICIPALITIES;
use alerta_es_service::services::BulletinService;

#[derive(Parser)]
#[command(name = "bulletin-scan")]
#[command(about = "Print every line of the latest extraordinary bulletin that mentions a Serrana municipality", long_about = None)]
struct Cli {
    /// Site origin
    #[arg(long, env = "ALERTA_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Scan the meteorological listing instead of the extraordinary one
    #[arg(long)]
    meteorological: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::with_base_url(cli.base_url);
    let classifier = BulletinClassifier::new(SERRANA_MUNICIPALITIES);
    let service = BulletinService::new(
        AlertaClient::new(&config)?,
        Arc::new(PdfExtractLoader),
        classifier.clone(),
    );

    let kind = if cli.meteorological {
        BulletinKind::Meteorological
    } else {
        BulletinKind::Extraordinary
    };

    let (link, pages) = service.latest_bulletin_pages(kind).await?;
    println!("Baixando PDF: {}", link.pdf_url);

    let hits = scan_pages(&*pages, &classifier);
    for (page, line) in &hits {
        println!("[Página {}] {}", page, line);
    }

    info!("{} matching lines in '{}'", hits.len(), link.title);
    println!("\n--- FIM ---");
    Ok(())
}
