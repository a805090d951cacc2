pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use colored::Colorize;
use serde_json::Value;

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
///
/// JSON keeps the full envelope. The other formats print only the result on
/// stdout and send the envelope warnings to stderr.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }

    if !matches!(format, OutputFormat::Json) {
        for warning in envelope_warnings(value) {
            eprintln!("{}: {}", "warning".yellow().bold(), warning);
        }
    }
}

fn envelope_warnings(value: &Value) -> impl Iterator<Item = &str> {
    value
        .get("warnings")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}
