//! Metrics command - CER/WER between a reference and an OCR hypothesis.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use recoup_core::metrics::{cer, wer};

use super::read_input;

/// Arguments for the metrics command.
#[derive(Args)]
pub struct MetricsArgs {
    /// Ground-truth reference text file
    #[arg(required = true)]
    reference: PathBuf,

    /// OCR output text file (use `-` for stdin)
    #[arg(required = true)]
    hypothesis: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct MetricsReport {
    cer: f64,
    wer: f64,
    reference_chars: usize,
    reference_words: usize,
}

pub async fn run(args: MetricsArgs) -> anyhow::Result<()> {
    let reference = read_input(&args.reference)?;
    let hypothesis = read_input(&args.hypothesis)?;

    let report = MetricsReport {
        cer: cer(&reference, &hypothesis),
        wer: wer(&reference, &hypothesis),
        reference_chars: reference.chars().count(),
        reference_words: reference.split_whitespace().count(),
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            println!("CER: {:.4}", report.cer);
            println!("WER: {:.4}", report.wer);
            println!(
                "Reference: {} chars, {} words",
                report.reference_chars, report.reference_words
            );
        }
    }

    Ok(())
}
