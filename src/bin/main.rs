//! pwd-classify CLI
//!
//! Checks one password against the length heuristic and the model
//! ensemble, prints the result and optionally exports it.
//!
//! ## Usage
//!
//! ```bash
//! # Password as argument (masked in the output)
//! pwd-classify 'Sunshine2024!'
//!
//! # Read from stdin, reveal it, export both formats
//! echo 'Sunshine2024!' | pwd-classify --show --pdf result.pdf --csv result.csv
//!
//! # Custom artifact directory
//! pwd-classify --models ./assets/models 'hunter2'
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::{Color, Stylize};
use secrecy::{ExposeSecret, SecretString};

use pwd_classify::{
    BucketColor, ModelSet, PASSWORD_TIPS, Prediction, Report, StrengthBucket, check_password,
    get_models, get_models_path, init_models_from_path, report_to_csv, report_to_pdf,
};

/// Estimate password strength with a length heuristic and four classifiers
#[derive(Parser)]
#[command(name = "pwd-classify")]
#[command(version)]
#[command(about = "Estimate password strength with a length heuristic and four classifiers", long_about = None)]
struct Cli {
    /// Password to check (reads one line from stdin if not provided)
    password: Option<String>,

    /// Print the password instead of masking it
    #[arg(long)]
    show: bool,

    /// Directory holding the model artifacts (overrides PWD_MODELS_PATH)
    #[arg(long, value_name = "DIR")]
    models: Option<PathBuf>,

    /// Base URL of remote model artifacts (overrides PWD_MODELS_URL)
    #[cfg(feature = "remote")]
    #[arg(long, value_name = "URL")]
    models_url: Option<String>,

    /// Write a PDF report to this path
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,

    /// Write a single-row CSV report to this path
    #[arg(long, value_name = "PATH")]
    csv: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let password = match &cli.password {
        Some(p) => SecretString::new(p.clone().into()),
        None => read_password()?,
    };

    let models = load_models(&cli)?;
    let report = check_password(&password, &models);

    print_report(&report, cli.show);

    if let Some(path) = &cli.pdf {
        let bytes = report_to_pdf(&report).context("Failed to render PDF report")?;
        write_export(path, &bytes)?;
    }
    if let Some(path) = &cli.csv {
        let bytes = report_to_csv(&report).context("Failed to render CSV report")?;
        write_export(path, &bytes)?;
    }

    Ok(())
}

fn read_password() -> Result<SecretString> {
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::new(password.into()))
}

fn load_models(cli: &Cli) -> Result<std::sync::Arc<ModelSet>> {
    #[cfg(feature = "remote")]
    {
        let url = cli.models_url.clone().or_else(pwd_classify::get_models_url);
        if let Some(url) = url.filter(|_| cli.models.is_none()) {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime
                .block_on(pwd_classify::init_models_from_url(&url))
                .with_context(|| format!("Failed to load models from {}", url))?;
            return get_models().context("Model set missing after initialization");
        }
    }

    let dir = cli.models.clone().unwrap_or_else(get_models_path);
    init_models_from_path(&dir)
        .with_context(|| format!("Failed to load models from {:?}", dir))?;
    get_models().context("Model set missing after initialization")
}

fn write_export(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {:?}", path))?;
    println!("{} {}", "Report written to".green(), path.display());
    Ok(())
}

fn terminal_color(color: BucketColor) -> Color {
    match color {
        BucketColor::Red => Color::Red,
        BucketColor::Orange => Color::DarkYellow,
        BucketColor::Green => Color::Green,
    }
}

fn print_report(report: &Report, show: bool) {
    let password = report.password().expose_secret();
    let shown = if show {
        password.to_string()
    } else {
        "*".repeat(password.chars().count())
    };
    println!("{} {}", "Password:".bold(), shown);

    if let Some(advisory) = report.short_password_advisory() {
        println!("{}", advisory.with(Color::Yellow));
    }

    let bucket = report.bucket();
    println!();
    println!("{}", "Length-Based Strength Estimate".bold());
    println!(
        "  {} - {}",
        bucket.label().with(terminal_color(bucket.color())).bold(),
        bucket.description()
    );

    println!();
    println!("{}", "Model Predictions".bold());
    for (name, prediction) in report.predictions().iter() {
        let known = match prediction {
            Prediction::Label(label) => StrengthBucket::from_label(label),
            Prediction::Failed(_) => None,
        };
        let line = match known {
            Some(b) => format!(
                "{} - {}",
                b.label().with(terminal_color(b.color())),
                b.description()
            ),
            None if prediction.is_failed() => prediction.to_string().with(Color::Red).to_string(),
            None => prediction.to_string(),
        };
        println!("  {}: {}", name.as_str().bold(), line);
    }

    println!();
    println!("{}", "Password Tips".bold());
    for tip in PASSWORD_TIPS {
        println!("  - {}", tip);
    }
    println!("{}", format!("Checked at {}", report.formatted_timestamp()).dark_grey());
}
