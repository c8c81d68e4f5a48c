//! Detect command - report a document's category and the evidence for it.

use std::path::PathBuf;

use clap::Args;
use console::style;

use carteira_core::{CardText, DocumentCategory, DocumentTypeDetector, IssuerRegistry};

/// Arguments for the detect command.
#[derive(Args)]
pub struct DetectArgs {
    /// Input file (OCR text, UTF-8)
    #[arg(required = true)]
    input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: DetectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let raw = super::read_text(&args.input)?;
    let text = CardText::new(&raw);

    let detector = DocumentTypeDetector::with_config(config.detection);
    let report = detector.detect(&text);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let marker = match report.category {
        DocumentCategory::Unknown => style("?").yellow(),
        _ => style("✓").green(),
    };
    println!(
        "{} Category: {} (confidence {:.2})",
        marker, report.category, report.confidence
    );
    println!("   RG signatures:   {}", join_or_none(&report.rg_hits));
    println!("   Card signatures: {}", join_or_none(&report.card_hits));

    if report.category == DocumentCategory::InsuranceCard {
        let registry = IssuerRegistry::global();
        for identity in registry.issuers() {
            let score = registry.score_signatures(identity.issuer, &text);
            if score.hits > 0 {
                println!(
                    "   {} {}: {} hit(s) {:?}",
                    style("ℹ").blue(),
                    identity.name,
                    score.hits,
                    score.matched
                );
            }
        }
    }

    Ok(())
}

fn join_or_none(hits: &[&str]) -> String {
    if hits.is_empty() {
        "none".to_string()
    } else {
        hits.join(", ")
    }
}
