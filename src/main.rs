//! Loan Simulator CLI
//!
//! Manage the product catalog and run loan simulations from the terminal

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use loan_simulator::config::ProviderKind;
use loan_simulator::product::{NewProduct, Product};
use loan_simulator::{AppConfig, ProductRegistry, SimulationRequest, SimulationResult, SimulationRunner};

#[derive(Parser)]
#[command(name = "loan-sim")]
#[command(author, version, about = "Loan product catalog and amortization simulator", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Product catalog CSV (overrides the config)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a loan against a registered product
    Simulate {
        /// Product id
        #[arg(short, long)]
        product: String,

        /// Amount to borrow
        #[arg(short, long)]
        valor: f64,

        /// Term in months
        #[arg(long, allow_hyphen_values = true)]
        prazo: i64,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Manage loan products (on the remote API when the remote provider is selected)
    #[command(subcommand)]
    Products(ProductCommands),

    /// Check that the remote API answers
    Ping,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List registered products
    List,
    /// Register a new product
    Add {
        #[arg(long)]
        nome: String,
        /// Annual interest rate in percent
        #[arg(long)]
        taxa: f64,
        /// Maximum term in months
        #[arg(long)]
        prazo_maximo: u32,
    },
    /// Delete a product by id
    Delete { id: String },
    /// Restore the default catalog
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }

    if config.provider == ProviderKind::Remote {
        if let Commands::Products(command) = cli.command {
            return run_remote_products(&config, command);
        }
    }

    let mut registry = ProductRegistry::load(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;

    match cli.command {
        Commands::Simulate { product, valor, prazo, format } => {
            let provider = config.build_provider().context("Failed to set up simulation provider")?;
            let runner = SimulationRunner::new(registry, provider);

            match runner.run(&SimulationRequest::new(product, valor, prazo)) {
                Ok(result) => print_result(&result, format)?,
                Err(e) => {
                    eprintln!("Simulation failed: {}", e);
                    std::process::exit(2);
                }
            }
        }
        Commands::Products(ProductCommands::List) => print_products(registry.list()),
        Commands::Products(ProductCommands::Add { nome, taxa, prazo_maximo }) => {
            let product = registry.register(NewProduct::new(nome, taxa, prazo_maximo))?;
            registry.save(&config.catalog_path)?;
            println!("Registered product {} ({})", product.id, product.name);
        }
        Commands::Products(ProductCommands::Delete { id }) => {
            if registry.delete(&id) {
                registry.save(&config.catalog_path)?;
                println!("Deleted product {}", id);
            } else {
                eprintln!("No product with id {}", id);
                std::process::exit(1);
            }
        }
        Commands::Products(ProductCommands::Reset) => {
            registry.reset();
            registry.save(&config.catalog_path)?;
            println!("Catalog reset to {} default products", registry.len());
        }
        Commands::Ping => ping(&config)?,
    }

    Ok(())
}

fn ping(config: &AppConfig) -> Result<()> {
    let client = config.remote_client().context("Failed to set up remote client")?;
    if client.check_connection() {
        println!("API reachable at {}", config.api_base_url);
        Ok(())
    } else {
        eprintln!("API not reachable at {}", config.api_base_url);
        std::process::exit(1);
    }
}

fn run_remote_products(config: &AppConfig, command: ProductCommands) -> Result<()> {
    let client = config.remote_client().context("Failed to set up remote client")?;

    match command {
        ProductCommands::List => print_products(&client.list_products()?),
        ProductCommands::Add { nome, taxa, prazo_maximo } => {
            let product = client.register_product(&NewProduct::new(nome, taxa, prazo_maximo))?;
            println!("Registered product {} ({})", product.id, product.name);
        }
        ProductCommands::Delete { id } => {
            if client.delete_product(&id)? {
                println!("Deleted product {}", id);
            } else {
                eprintln!("No product with id {}", id);
                std::process::exit(1);
            }
        }
        ProductCommands::Reset => {
            anyhow::bail!("the remote API has no reset route; reset the server's catalog instead")
        }
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    println!("{:<16} {:<32} {:>10} {:>8}", "Id", "Nome", "Taxa a.a.", "Prazo");
    println!("{}", "-".repeat(69));
    for p in products {
        println!("{:<16} {:<32} {:>9.2}% {:>8}", p.id, p.name, p.annual_rate, p.max_term);
    }
}

fn print_result(result: &SimulationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for row in &result.schedule {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        OutputFormat::Table => {
            println!("Produto:        {}", result.product);
            println!("Valor:          {}", result.principal);
            println!("Prazo:          {} meses", result.term_months);
            println!("Taxa anual:     {}%", result.annual_rate);
            println!("Taxa mensal:    {}%", result.monthly_rate);
            println!("Parcela:        {}", result.installment);
            println!("Total a pagar:  {}", result.total_paid);
            println!("Total de juros: {}", result.total_interest);
            println!();
            println!("{:>5} {:>14} {:>14} {:>14} {:>16}", "Mes", "Parcela", "Juros", "Amortizacao", "Saldo");
            println!("{}", "-".repeat(67));
            for row in &result.schedule {
                println!(
                    "{:>5} {:>14} {:>14} {:>14} {:>16}",
                    row.month, row.installment, row.interest, row.principal, row.balance
                );
            }
        }
    }
    Ok(())
}
