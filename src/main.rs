use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use ngtax::config::Config;
use ngtax::core::{BusinessType, SimulationScenario, TaxInput, compute, simulate};

#[derive(Parser)]
#[command(name = "ngtax", version, about = "Nigerian tax calculator and projection simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Overrides PORT from the environment.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Compute one year of taxes and print the breakdown as JSON.
    Calculate(TaxArgs),
    /// Project a multi-year investment and print the result as JSON.
    Simulate {
        #[command(flatten)]
        tax: TaxArgs,
        #[arg(long, default_value_t = 0.0)]
        initial_investment: f64,
        /// Annual growth as a fraction, e.g. 0.10.
        #[arg(long, default_value_t = 0.10, allow_hyphen_values = true)]
        growth_rate: f64,
        /// Annual inflation as a fraction, e.g. 0.15.
        #[arg(long, default_value_t = 0.15, allow_hyphen_values = true)]
        inflation_rate: f64,
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=20))]
        years: u32,
    },
}

#[derive(Args)]
struct TaxArgs {
    #[arg(long, default_value_t = 0.0)]
    revenue: f64,
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    profit: f64,
    #[arg(long, default_value_t = 0.0)]
    capital_gains: f64,
    #[arg(long, default_value_t = 0.0)]
    digital_assets: f64,
    #[arg(long, default_value_t = 0.0)]
    turnover: f64,
    #[arg(long, value_enum, default_value_t = CliBusinessType::Sme)]
    business_type: CliBusinessType,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliBusinessType {
    Sme,
    Large,
}

impl From<&TaxArgs> for TaxInput {
    fn from(args: &TaxArgs) -> Self {
        TaxInput {
            revenue: args.revenue,
            profit: args.profit,
            capital_gains: args.capital_gains,
            digital_assets: args.digital_assets,
            turnover: args.turnover,
            business_type: match args.business_type {
                CliBusinessType::Sme => BusinessType::Sme,
                CliBusinessType::Large => BusinessType::Large,
            },
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ngtax=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            let mut config = Config::from_env();
            if let Some(port) = port {
                config.port = port;
            }
            ngtax::api::run_http_server(&config).await?;
        }
        Command::Calculate(args) => {
            let result = compute(&TaxInput::from(&args));
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Simulate {
            tax,
            initial_investment,
            growth_rate,
            inflation_rate,
            years,
        } => {
            let result = simulate(&SimulationScenario {
                base: TaxInput::from(&tax),
                initial_investment,
                growth_rate,
                inflation_rate,
                years,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
