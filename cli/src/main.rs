mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use formatter::Formatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use ucum::{Configuration, Decimal, Engine, PrintStyle};

#[derive(Parser)]
#[command(name = "ucum")]
#[command(about = "Units of measure that mean business.")]
#[command(
    long_about = "Validate, canonicalize and convert UCUM unit expressions with exact decimal arithmetic.\nSet RUST_LOG=ucum=debug to trace what the engine does."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    flags: FlagArgs,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Args)]
struct FlagArgs {
    /// Allow prefixes on non-metric units, e.g. k[in_i]
    #[arg(long, global = true)]
    prefix_on_non_metric: bool,

    /// Allow an annotation right after parentheses, e.g. (m.s){x}
    #[arg(long, global = true)]
    annotation_after_parens: bool,

    /// Refuse mole to gram conversions even when a molar mass is given
    #[arg(long, global = true)]
    no_mol_mass_conversion: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that an expression is valid UCUM
    Validate {
        /// Unit expression, e.g. kg.m/s2
        expression: String,
    },
    /// Reduce an expression to base units
    ///
    /// Shows the canonical code, the magnitude relative to it, the dimension
    /// and the special function, if any.
    Canonicalize {
        /// Unit expression, e.g. mm[Hg]
        expression: String,
    },
    /// Convert a value between two units
    ///
    /// Examples:
    ///   ucum convert 1 [in_i] cm
    ///   ucum convert 37 Cel [degF]
    ///   ucum convert 2 mmol mg --molar-mass 180.16
    Convert {
        /// Value to convert
        #[arg(allow_hyphen_values = true)]
        factor: String,
        /// Unit of the value
        from: String,
        /// Target unit
        to: String,
        /// Grams per mole, for conversions between mass and amount of substance
        #[arg(long)]
        molar_mass: Option<String>,
    },
    /// Print an expression in another style
    Print {
        /// Unit expression
        expression: String,
        /// ucum, pretty, wolfram or expressive
        #[arg(short, long, default_value = "ucum")]
        style: PrintStyle,
    },
    /// Tell whether two expressions are equal, commensurable or neither
    Check {
        left: String,
        right: String,
    },
    /// Validate every line of a file
    ///
    /// Blank lines and lines starting with '#' are skipped.
    Batch {
        /// File with one expression per line
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let engine = Engine::with_config(configuration(&cli.flags));
    let formatter = Formatter::new(cli.json);

    let result = match &cli.command {
        Commands::Validate { expression } => validate_command(&engine, &formatter, expression),
        Commands::Canonicalize { expression } => canonicalize_command(&engine, &formatter, expression),
        Commands::Convert {
            factor,
            from,
            to,
            molar_mass,
        } => convert_command(&engine, &formatter, factor, from, to, molar_mass.as_deref()),
        Commands::Print { expression, style } => print_command(&engine, &formatter, expression, *style),
        Commands::Check { left, right } => check_command(&engine, &formatter, left, right),
        Commands::Batch { file } => batch_command(&engine, &formatter, file),
    };

    if let Err(e) = result {
        if let Some(ucum_err) = e.downcast_ref::<ucum::UcumError>() {
            eprintln!("{}", error_formatter::format_error(ucum_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn configuration(flags: &FlagArgs) -> Configuration {
    Configuration::builder()
        .prefix_on_non_metric(flags.prefix_on_non_metric)
        .annotation_after_parens(flags.annotation_after_parens)
        .mol_mass_conversion(!flags.no_mol_mass_conversion)
        .build()
}

fn validate_command(engine: &Engine, formatter: &Formatter, expression: &str) -> Result<()> {
    let term = engine.validate(expression)?;
    print!("{}", formatter.format_valid(expression, &term)?);
    Ok(())
}

fn canonicalize_command(engine: &Engine, formatter: &Formatter, expression: &str) -> Result<()> {
    let term = engine.validate(expression)?;
    let canonical = engine.canonicalize(&term)?;
    print!("{}", formatter.format_canonical(expression, &canonical)?);
    Ok(())
}

fn convert_command(
    engine: &Engine,
    formatter: &Formatter,
    factor: &str,
    from: &str,
    to: &str,
    molar_mass: Option<&str>,
) -> Result<()> {
    let factor: Decimal = factor
        .parse()
        .with_context(|| format!("'{}' is not a number", factor))?;
    let from = engine.validate(from)?;
    let to = engine.validate(to)?;
    let converted = match molar_mass {
        Some(coefficient) => {
            let coefficient: Decimal = coefficient
                .parse()
                .with_context(|| format!("molar mass '{}' is not a number", coefficient))?;
            engine.convert_with_molar_mass(&factor, &from, &to, &coefficient)?
        }
        None => engine.convert(&factor, &from, &to)?,
    };
    print!("{}", formatter.format_conversion(&converted)?);
    Ok(())
}

fn print_command(engine: &Engine, formatter: &Formatter, expression: &str, style: PrintStyle) -> Result<()> {
    let term = engine.validate(expression)?;
    print!("{}", formatter.format_printed(style, &engine.print(&term, style))?);
    Ok(())
}

fn check_command(engine: &Engine, formatter: &Formatter, left: &str, right: &str) -> Result<()> {
    let left_term = engine.validate(left)?;
    let right_term = engine.validate(right)?;
    let relation = engine.relation(&left_term, &right_term)?;
    print!("{}", formatter.format_relation(left, right, &relation)?);
    Ok(())
}

fn batch_command(engine: &Engine, formatter: &Formatter, file: &Path) -> Result<()> {
    let content = fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))?;
    let expressions: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    let results = engine.validate_batch(&expressions);
    let failures = results.iter().filter(|r| r.is_err()).count();
    print!("{}", formatter.format_batch(&expressions, &results)?);

    if failures > 0 {
        anyhow::bail!("{} of {} expressions are invalid", failures, expressions.len());
    }
    Ok(())
}
