//! Process command - extract fields from a single OCR text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use carteira_core::{assemble, DocumentCategory, DocumentPipeline, StructuredDocument};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text, UTF-8)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Expected document category (advisory)
    #[arg(long, value_enum)]
    hint: Option<CategoryHint>,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
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

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CategoryHint {
    /// RG identity card
    Rg,
    /// Health-insurance card
    Card,
}

impl From<CategoryHint> for DocumentCategory {
    fn from(hint: CategoryHint) -> Self {
        match hint {
            CategoryHint::Rg => DocumentCategory::RgIdentity,
            CategoryHint::Card => DocumentCategory::InsuranceCard,
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let threshold = config.extraction.accept_threshold;

    info!("Processing file: {}", args.input.display());
    let text = super::read_text(&args.input)?;

    let pipeline = DocumentPipeline::with_config(config);
    let result = pipeline.process(&text, args.hint.map(Into::into));
    let document = assemble(&result, threshold);

    let output = format_document(&document, args.format)?;

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

    if args.show_confidence {
        println!();
        println!(
            "{} Extraction confidence: {:.1}%",
            style("ℹ").blue(),
            document.confidence * 100.0
        );
        for (field, confidence) in &document.field_confidence {
            println!("   {:<22} {:.1}%", field, confidence * 100.0);
        }
        if document.needs_review {
            println!("{} Needs manual review", style("!").yellow());
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn format_document(document: &StructuredDocument, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        OutputFormat::Csv => format_csv(document),
        OutputFormat::Text => Ok(format_text(document)),
    }
}

fn format_csv(document: &StructuredDocument) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(StructuredDocument::CSV_HEADERS)?;
    wtr.write_record(document.to_csv_record())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(document: &StructuredDocument) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", document.category));
    if let Some(issuer) = &document.issuer {
        match &document.issuer_code {
            Some(code) => output.push_str(&format!("Issuer: {} (ANS {})\n", issuer, code)),
            None => output.push_str(&format!("Issuer: {}\n", issuer)),
        }
    }
    if let Some(method) = document.method {
        output.push_str(&format!("Method: {}\n", method));
    }
    output.push('\n');

    let fields = [
        ("Name", &document.holder_name),
        ("RG", &document.identity_number),
        ("CPF", &document.taxpayer_id),
        ("Birth date", &document.birth_date),
        ("Card number", &document.card_number),
        ("Plan", &document.plan_name),
        ("CNS", &document.health_system_number),
        ("Issued", &document.issue_date),
        ("Valid until", &document.valid_until),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            output.push_str(&format!("  {:<12} {}\n", format!("{}:", label), value));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "Confidence: {:.2} ({})\n",
        document.confidence,
        if document.accepted { "accepted" } else { "needs review" }
    ));

    if !document.issues.is_empty() {
        output.push_str("Issues:\n");
        for issue in &document.issues {
            output.push_str(&format!("  - {}\n", issue));
        }
    }

    output
}
