use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use alerta_es_service::risk::{load_rules, run_consolidation, ConsolidationRules, RiskInputs};

#[derive(Parser)]
#[command(name = "consolidate-risks")]
#[command(about = "Merge the risk-area CSV exports into the dashboard data.js file", long_about = None)]
struct Cli {
    /// Directory holding the CSV exports
    #[arg(long, env = "RISK_INPUT_DIR", default_value = ".")]
    input_dir: PathBuf,

    /// Household risk table (relative to --input-dir)
    #[arg(long, default_value = "Tabela_Moradias_Risco_Geologico_Hidrológico.csv")]
    households: PathBuf,

    /// Points inside geological risk sectors
    #[arg(long, default_value = "pontos_dentro_risco_geologico.csv")]
    geological: PathBuf,

    /// Points inside CPRM flood susceptibility areas
    #[arg(long, default_value = "Pontos_IBGE_Risco_Inundacao_CPRM.csv")]
    hydrological: PathBuf,

    /// Exact point coordinates
    #[arg(long, default_value = "pontos_risco_exatos.csv")]
    exact: PathBuf,

    /// Output script
    #[arg(long, env = "RISK_OUTPUT", default_value = "data.js")]
    output: PathBuf,

    /// JSON file replacing the built-in sector table and text rules
    #[arg(long)]
    rules: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let rules = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => ConsolidationRules::default(),
    };

    let inputs = RiskInputs {
        households: cli.input_dir.join(&cli.households),
        geological_points: cli.input_dir.join(&cli.geological),
        hydrological_points: cli.input_dir.join(&cli.hydrological),
        exact_points: cli.input_dir.join(&cli.exact),
        output: cli.output,
    };

    info!("Starting data conversion...");
    match run_consolidation(&inputs, &rules) {
        Ok(summary) => {
            info!(
                "Wrote {} records ({} with coordinates)",
                summary.records, summary.records_with_coordinates
            );
            Ok(())
        }
        Err(e) => {
            error!("Error: {}", e);
            Err(e.into())
        }
    }
}
