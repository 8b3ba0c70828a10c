use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use json_decimal::{AppConfig, ConversionRule, TokenInfo};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rewrite wei-style token amounts in a JSON document as decimal strings.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON document to convert. Reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Settings file with `rules` and `tokens` sections.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extra rule appended after the configured ones, e.g. `tokenIn=amountIn,execAmountIn`.
    #[arg(long = "rule", value_name = "TOKEN_KEY=AMOUNT_KEY[,AMOUNT_KEY...]")]
    rules: Vec<ConversionRule>,

    /// Token entry applied over the configured table, e.g. `0xdac1...1ec7=6:USDT`.
    #[arg(long = "token", value_name = "ADDRESS=DECIMALS[:SYMBOL]", value_parser = parse_token)]
    tokens: Vec<(String, TokenInfo)>,

    /// Print the result on a single line.
    #[arg(long)]
    compact: bool,

    /// Print the number of converted fields and any warnings to stderr.
    #[arg(long)]
    report: bool,

    /// Print the effective settings and exit.
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => AppConfig::default(),
    };
    config.rules.extend(cli.rules.iter().cloned());

    for (address, info) in &cli.tokens {
        config.tokens.insert(address.to_lowercase(), info.clone());
    }
    let registry = config.registry();

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let text = read_input(cli.input.as_deref())?;
    let document = json_decimal::parse_document(&text).context("input is not valid JSON")?;
    let result = json_decimal::convert_with_report(&document, &config.rules, &registry);
    info!(converted = result.report.converted, "conversion finished");

    let output = if cli.compact {
        serde_json::to_string(&result.value)?
    } else {
        serde_json::to_string_pretty(&result.value)?
    };
    println!("{output}");

    if cli.report {
        eprintln!("converted {} field(s)", result.report.converted);
        for warning in &result.report.warnings {
            eprintln!("warning: {warning}");
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Parse `ADDRESS=DECIMALS[:SYMBOL]`.
fn parse_token(s: &str) -> Result<(String, TokenInfo), String> {
    let (address, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=DECIMALS[:SYMBOL], got {s:?}"))?;
    let address = address.trim();
    if address.is_empty() {
        return Err("token address is empty".to_string());
    }

    let (decimals, symbol) = value.split_once(':').unwrap_or((value, ""));
    let decimals: u8 = decimals
        .trim()
        .parse()
        .map_err(|e| format!("invalid decimals {decimals:?}: {e}"))?;

    Ok((address.to_string(), TokenInfo::new(decimals, symbol.trim())))
}
