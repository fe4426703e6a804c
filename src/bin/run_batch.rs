//! Run a batch of simulations from a CSV file
//!
//! Input columns: `productId,valor,prazo`. Writes one summary line per request.

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use loan_simulator::{AppConfig, ProductRegistry, SimulationRequest, SimulationRunner};

#[derive(Parser)]
#[command(name = "run_batch", about = "Run loan simulations for every row of a CSV file")]
struct Args {
    /// CSV with productId,valor,prazo columns
    input: PathBuf,

    /// Output CSV path
    #[arg(short, long, default_value = "simulation_batch_output.csv")]
    output: PathBuf,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// One line of batch output
#[derive(Debug, Serialize)]
struct BatchRow {
    #[serde(rename = "productId")]
    product_id: String,
    valor: f64,
    prazo: String,
    #[serde(rename = "valorParcela")]
    installment: Option<String>,
    #[serde(rename = "totalPagar")]
    total_paid: Option<String>,
    #[serde(rename = "totalJuros")]
    total_interest: Option<String>,
    error: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let registry = ProductRegistry::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;

    let mut reader = csv::Reader::from_path(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let requests: Vec<SimulationRequest> = reader
        .deserialize()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    println!("Loaded {} requests in {:?}", requests.len(), start.elapsed());

    let runner = SimulationRunner::new(registry, config.build_provider()?);
    let run_start = Instant::now();
    let results = runner.run_batch(&requests);
    println!("Simulations complete in {:?} ({} provider)", run_start.elapsed(), runner.provider_name());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    let mut failures = 0;

    for (request, result) in requests.iter().zip(results) {
        let row = match result {
            Ok(r) => BatchRow {
                product_id: request.product_id.clone(),
                valor: request.valor,
                prazo: request.prazo.to_string(),
                installment: Some(r.installment),
                total_paid: Some(r.total_paid),
                total_interest: Some(r.total_interest),
                error: None,
            },
            Err(e) => {
                failures += 1;
                BatchRow {
                    product_id: request.product_id.clone(),
                    valor: request.valor,
                    prazo: request.prazo.to_string(),
                    installment: None,
                    total_paid: None,
                    total_interest: None,
                    error: Some(e.to_string()),
                }
            }
        };
        writer.serialize(row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output.display());
    println!("  Succeeded: {}", requests.len() - failures);
    println!("  Failed:    {}", failures);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
