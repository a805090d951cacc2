mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::financing::ScheduleArgs;
use commands::projection::{ProjectionArgs, ValidateArgs};

/// Multi-year projections for a real-estate holding company
#[derive(Parser)]
#[command(
    name = "hpx",
    version,
    about = "Multi-year projections for a real-estate holding company",
    long_about = "A CLI that projects the income statement, cash flow and reserve of a \
                  property-holding company year by year, with decimal precision. Covers \
                  loan amortisation with deferral, depreciation and corporate tax."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log computation steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full projection (income statement, treasury and reserve)
    Project(ProjectionArgs),
    /// Income statement rows only
    IncomeStatement(ProjectionArgs),
    /// Cash flow and reserve rows only
    Treasury(ProjectionArgs),
    /// Per-property summary (cost, financing, yields)
    Properties(ProjectionArgs),
    /// Month-by-month amortisation table of a single loan
    Schedule(ScheduleArgs),
    /// Check an entity description without projecting it
    Validate(ValidateArgs),
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
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::IncomeStatement(args) => commands::projection::run_income_statement(args),
        Commands::Treasury(args) => commands::projection::run_treasury(args),
        Commands::Properties(args) => commands::projection::run_properties(args),
        Commands::Schedule(args) => commands::financing::run_schedule(args),
        Commands::Validate(args) => commands::projection::run_validate(args),
        Commands::Version => {
            println!("hpx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
