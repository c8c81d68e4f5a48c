//! Batch processing command for multiple OCR text files.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use carteira_core::{assemble, DocumentPipeline, StructuredDocument};

use super::process::{format_document, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    document: Option<StructuredDocument>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;
    let threshold = config.extraction.accept_threshold;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "txt" | "text" | "ocr")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let pipeline = Arc::new(DocumentPipeline::with_config(config));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for path in files {
        let permit = permits.clone().acquire_owned().await?;
        let pipeline = Arc::clone(&pipeline);
        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &pipeline, threshold);
            (path, outcome, file_start.elapsed().as_millis() as u64)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (path, outcome, processing_time_ms) = joined?;

        match outcome {
            Ok(document) => results.push(ProcessResult {
                path,
                document: Some(document),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(ProcessResult {
                        path,
                        document: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    anyhow::bail!("Processing failed: {}", error_msg);
                }
            }
        }

        overall_pb.inc(1);
    }

    overall_pb.finish_with_message("Complete");

    // Workers finish in any order.
    results.sort_by(|a, b| a.path.cmp(&b.path));

    let successful: Vec<_> = results.iter().filter(|r| r.document.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let review = successful
        .iter()
        .filter(|r| r.document.as_ref().is_some_and(|d| d.needs_review))
        .count();

    if let Some(output_dir) = &args.output_dir {
        let paths: Vec<&Path> = successful.iter().map(|r| r.path.as_path()).collect();
        let names = output_names(&paths);

        for (result, output_name) in successful.iter().zip(names) {
            if let Some(document) = &result.document {
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_document(document, args.format)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} need review, {} failed",
        style(successful.len()).green(),
        style(review).yellow(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output file stems for the inputs, in order. A stem shared by several
/// inputs gets a `-2`, `-3`, ... suffix after its first use.
fn output_names(paths: &[&Path]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("document")
                .to_string();
            let count = seen.entry(stem.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                stem
            } else {
                format!("{}-{}", stem, count)
            }
        })
        .collect()
}

fn process_single_file(
    path: &Path,
    pipeline: &DocumentPipeline,
    threshold: f32,
) -> anyhow::Result<StructuredDocument> {
    let text = super::read_text(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("File contains no text");
    }

    let result = pipeline.process(&text, None);
    Ok(assemble(&result, threshold))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "category",
        "issuer",
        "method",
        "holder_name",
        "confidence",
        "needs_review",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");

        if let Some(document) = &result.document {
            wtr.write_record([
                filename,
                "success",
                &document.category.to_string(),
                document.issuer.as_deref().unwrap_or(""),
                &document.method.map(|m| m.to_string()).unwrap_or_default(),
                document.holder_name.as_deref().unwrap_or(""),
                &format!("{:.2}", document.confidence),
                &document.needs_review.to_string(),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names_are_unique() {
        let paths = [
            Path::new("a/card.txt"),
            Path::new("b/card.txt"),
            Path::new("b/rg.txt"),
            Path::new("c/card.ocr"),
        ];
        assert_eq!(output_names(&paths), vec!["card", "card-2", "rg", "card-3"]);
    }
}
