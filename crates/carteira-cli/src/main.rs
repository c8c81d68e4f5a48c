//! CLI application for reading Brazilian insurance cards and RG identity
//! cards from OCR text.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, detect, process, validate};

/// Carteira - extract structured fields from insurance-card and RG OCR text
#[derive(Parser)]
#[command(name = "carteira")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fields from a single OCR text file
    Process(process::ProcessArgs),

    /// Extract fields from multiple OCR text files
    Batch(batch::BatchArgs),

    /// Detect the document category of an OCR text file
    Detect(detect::DetectArgs),

    /// Check a single CPF, RG, CNS or date value
    Validate(validate::ValidateArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Detect(args) => detect::run(args, cli.config.as_deref()).await,
        Commands::Validate(args) => validate::run(args).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
