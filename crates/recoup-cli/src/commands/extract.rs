//! Extract command - recover fields from a single OCR text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use recoup_core::extract::{Extraction, FieldExtractor};
use recoup_core::models::InvoiceFields;
use recoup_core::pipeline::{DocumentReport, Pipeline};
use recoup_core::text::clean_text;
use recoup_core::validate::ValidationStatus;

use super::{load_config, read_input};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file (use `-` for stdin)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also validate the extracted fields
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let text = read_input(&args.input)?;

    info!("Extracting from {}", args.input.display());

    let output = if args.validate {
        let report = Pipeline::from_config(&config).process(&text);
        format_report(&report, args.format)?
    } else {
        let extractor = FieldExtractor::new()
            .with_id_repair(config.extraction.repair_invoice_ids)
            .with_percent_restore(config.extraction.restore_tax_percent)
            .with_quantity_normalization(config.extraction.normalize_quantities);
        let extraction = extractor.extract(&clean_text(&text));
        format_extraction(&extraction, args.format)?
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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => format_csv(&extraction.fields, None),
        OutputFormat::Text => {
            let mut output = format_fields_text(&extraction.fields);
            push_corrections_text(&mut output, &extraction.corrections);
            Ok(output)
        }
    }
}

fn format_report(report: &DocumentReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(&report.fields, Some(report.status)),
        OutputFormat::Text => {
            let mut output = format_fields_text(&report.fields);
            output.push_str(&format!("\nStatus: {}\n", report.status));
            if !report.errors.is_empty() {
                output.push_str("Errors:\n");
                for error in &report.errors {
                    output.push_str(&format!("  - {}\n", error));
                }
            }
            push_corrections_text(&mut output, &report.corrections);
            Ok(output)
        }
    }
}

fn format_csv(fields: &InvoiceFields, status: Option<ValidationStatus>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_id",
        "invoice_date",
        "tax_percentage",
        "subtotal",
        "tax_amount",
        "discount",
        "total",
        "status",
    ])?;

    wtr.write_record([
        fields.invoice_id.clone().unwrap_or_default(),
        fields.invoice_date.clone().unwrap_or_default(),
        number_cell(fields.tax_percentage),
        number_cell(fields.subtotal),
        number_cell(fields.tax_amount),
        number_cell(fields.discount),
        number_cell(fields.total),
        status.map(|s| s.to_string()).unwrap_or_default(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_fields_text(fields: &InvoiceFields) -> String {
    let mut output = String::new();

    output.push_str("Fields:\n");
    output.push_str(&format!(
        "  Invoice ID:     {}\n",
        fields.invoice_id.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Invoice date:   {}\n",
        fields.invoice_date.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "  Tax percentage: {}\n",
        display_cell(fields.tax_percentage)
    ));
    output.push_str(&format!("  Subtotal:       {}\n", display_cell(fields.subtotal)));
    output.push_str(&format!("  Tax amount:     {}\n", display_cell(fields.tax_amount)));
    output.push_str(&format!("  Discount:       {}\n", display_cell(fields.discount)));
    output.push_str(&format!("  Total:          {}\n", display_cell(fields.total)));

    output
}

fn push_corrections_text(output: &mut String, corrections: &[recoup_core::models::Correction]) {
    if corrections.is_empty() {
        return;
    }

    output.push_str("\nCorrections:\n");
    for correction in corrections {
        output.push_str(&format!(
            "  - {}: {} -> {}\n",
            correction.reason, correction.original, correction.corrected
        ));
    }
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn display_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
