use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use holding_projection_core::financing::{self, LoanInput};

use crate::input;

/// Arguments for a single loan schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    /// Path to JSON or YAML loan terms (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Borrowed amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Nominal annual rate as a decimal (e.g. 0.031 for 3.1%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Months during which only interest is paid
    #[arg(long, default_value = "0")]
    pub partial_deferral: u32,

    /// Months during which nothing is paid and interest is capitalised
    #[arg(long, default_value = "0")]
    pub total_deferral: u32,

    /// One-off bank fees charged at signature
    #[arg(long)]
    pub origination_fee: Option<Decimal>,

    /// One-off guarantee fees charged at signature
    #[arg(long)]
    pub guarantee_fee: Option<Decimal>,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let years = args.years.ok_or("--years is required (or provide --input)")?;
        LoanInput {
            principal,
            annual_rate: args.rate.unwrap_or(Decimal::ZERO),
            term_years: years,
            partial_deferral_months: args.partial_deferral,
            total_deferral_months: args.total_deferral,
            origination_fee: args.origination_fee.unwrap_or(Decimal::ZERO),
            guarantee_fee: args.guarantee_fee.unwrap_or(Decimal::ZERO),
        }
    };

    let result = financing::run_schedule(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
