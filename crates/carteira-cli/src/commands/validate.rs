//! Validate command - run a single field validator.

use clap::{Args, ValueEnum};
use console::style;

use carteira_core::fields::{
    classify_id_length, digits_of, format_date_iso, format_health_system_number,
    format_taxpayer_id, normalize_identity_number, parse_local_date, validate_checksum_id,
    validate_health_system_number, IdLengthClass,
};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Kind of value
    #[arg(value_enum)]
    kind: ValueKind,

    /// Value to check
    value: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValueKind {
    /// CPF (taxpayer id)
    Cpf,
    /// RG number
    Rg,
    /// CNS (national health-system number)
    Cns,
    /// Date (DD/MM/YYYY or DD/MMM/YYYY)
    Date,
}

pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let normalized = match args.kind {
        ValueKind::Cpf => {
            let digits = digits_of(&args.value);
            validate_checksum_id(&digits).then(|| format_taxpayer_id(&digits))
        }
        ValueKind::Rg => normalize_identity_number(&args.value)
            .filter(|n| classify_id_length(n) == IdLengthClass::ShortId),
        ValueKind::Cns => {
            let digits = digits_of(&args.value);
            validate_health_system_number(&digits).then(|| format_health_system_number(&digits))
        }
        ValueKind::Date => parse_local_date(&args.value).map(format_date_iso),
    };

    match normalized {
        Some(value) => {
            println!("{} valid: {}", style("✓").green(), value);
            Ok(())
        }
        None => {
            if matches!(args.kind, ValueKind::Rg) {
                println!(
                    "{} length class: {:?}",
                    style("ℹ").blue(),
                    classify_id_length(&args.value)
                );
            }
            anyhow::bail!("Invalid {:?}: {}", args.kind, args.value)
        }
    }
}
