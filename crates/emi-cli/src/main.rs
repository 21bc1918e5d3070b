mod commands;
mod config;
mod exchange;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{LoanArgs, ScheduleArgs};
use commands::rates::RatesArgs;
use exchange::DisplayOptions;

/// Loan EMI and amortisation schedule calculations
#[derive(Parser)]
#[command(
    name = "emi",
    version,
    about = "Loan EMI and amortisation schedule calculations",
    long_about = "A CLI for fixed-rate instalment loans with decimal precision. \
                  Computes the equated monthly instalment, total payment and \
                  interest, and the month-by-month amortisation schedule, with \
                  optional display conversion out of INR."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Display currency code (e.g. USD); amounts are computed in INR
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Saved exchange-rate response to use as a cache
    #[arg(long, global = true)]
    rates_file: Option<String>,

    /// Never call the exchange-rate API
    #[arg(long, global = true)]
    offline: bool,

    /// Path to a TOML config file (default: ./emi.toml if present)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// EMI, total payment, total interest and principal/interest split
    Summary(LoanArgs),
    /// Month-by-month amortisation schedule
    Schedule(ScheduleArgs),
    /// Summary and schedule together
    Analyze(LoanArgs),
    /// List exchange rates against INR
    Rates(RatesArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let _ = dotenv::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = match config::AppConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let opts = DisplayOptions {
        currency: cli.currency.clone(),
        rates_file: cli.rates_file.clone(),
        offline: cli.offline,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::loan::run_summary(args, &opts, &cfg),
        Commands::Schedule(args) => commands::loan::run_schedule(args, &opts, &cfg),
        Commands::Analyze(args) => commands::loan::run_analyze(args, &opts, &cfg),
        Commands::Rates(args) => commands::rates::run_rates(args, &opts, &cfg),
        Commands::Version => {
            println!("emi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "emi=warn,emi_core=warn",
        1 => "emi=info,emi_core=info",
        _ => "emi=debug,emi_core=debug",
    }
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    if std::env::var("EMI_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
