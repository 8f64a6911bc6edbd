//! Validate command - check a JSON field mapping for consistency.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use recoup_core::models::InvoiceFields;
use recoup_core::validate::{FieldValidator, Validated, ValidationStatus};

use super::{load_config, read_input};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// JSON file with the field mapping (use `-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Absolute tolerance for arithmetic checks (overrides config)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub async fn run(args: ValidateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let content = read_input(&args.input)?;

    let fields: InvoiceFields = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid field JSON in {}: {}", args.input.display(), e))?;

    let tolerance = args.tolerance.unwrap_or(config.validation.tolerance);
    info!("Validating fields with tolerance {}", tolerance);

    let validated = FieldValidator::new().with_tolerance(tolerance).validate(&fields);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&validated)?,
        OutputFormat::Text => format_text(&validated),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    // Non-zero exit for invalid records so scripts can branch on it.
    if validated.report.status == ValidationStatus::Invalid {
        std::process::exit(1);
    }

    Ok(())
}

fn format_text(validated: &Validated) -> String {
    let status = match validated.report.status {
        ValidationStatus::Valid => style("valid").green(),
        ValidationStatus::Corrected => style("corrected").yellow(),
        ValidationStatus::Invalid => style("invalid").red(),
    };

    let mut output = format!("Status: {}\n", status);

    if !validated.report.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &validated.report.errors {
            output.push_str(&format!("  - {}\n", error));
        }
    }

    if !validated.report.corrections.is_empty() {
        output.push_str("\nCorrections:\n");
        for correction in &validated.report.corrections {
            output.push_str(&format!(
                "  - {}: {} -> {}\n",
                correction.reason, correction.original, correction.corrected
            ));
        }
    }

    output
}
