//! trade-recap CLI - batch recap of futures trade history into one workbook
//!
//! ## Example Usage
//!
//! ```bash
//! trade-recap --rates Informasi_Kurs_Jisdor.xlsx \
//!     --trade-file trade_history_dec24.xlsx \
//!     --trade-file trade_history_jan25.xlsx \
//!     --output recap.xlsx --summary-json recap.json
//! ```
//!
//! ## Configuration
//!
//! Optional TOML file (`--config`, else `~/.trade-recap/config.toml`):
//!
//! ```toml
//! rate_spot = 5000000.0
//! rate_remote = 3500000.0
//!
//! [jisdor]
//! header_row = 4
//! date_column = "Tanggal"
//! rate_column = "Kurs"
//! ```

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use trade_recap::engine::{EngineConfig, FileReport, RecapEngine};
use trade_recap::report::{write_summary_json, WorkbookReport};

/// trade-recap: notional value, margin and USD recap of futures trades
#[derive(Parser)]
#[command(name = "trade-recap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Robert Fall")]
#[command(about = "Recap commodity-futures trade history into an Excel workbook", long_about = None)]
struct Cli {
    /// JISDOR reference rate file (xlsx/xls/ods/csv)
    #[arg(short = 'r', long, value_name = "PATH")]
    rates: PathBuf,

    /// Trade history file; repeat for several files
    #[arg(short = 't', long = "trade-file", value_name = "PATH", required = true)]
    trade_files: Vec<PathBuf>,

    /// Output workbook (.xlsx)
    #[arg(short = 'o', long, value_name = "PATH")]
    output: PathBuf,

    /// Margin rate per lot per side inside the spot window
    #[arg(long)]
    rate_spot: Option<f64>,

    /// Margin rate per lot per side outside the spot window
    #[arg(long)]
    rate_remote: Option<f64>,

    /// Also write the recap tables as JSON
    #[arg(long, value_name = "PATH")]
    summary_json: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".trade-recap").join("config.toml"))
}

/// Load the engine configuration; unreadable or invalid files fall back to defaults
fn load_config(path: Option<&Path>) -> EngineConfig {
    let explicit = path.is_some();
    let config_path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(p) if p.exists() => p,
        Some(p) => {
            if explicit {
                eprintln!(
                    "{} Config file {} not found, using defaults",
                    "Warning:".yellow(),
                    p.display()
                );
            }
            return EngineConfig::default();
        }
        None => return EngineConfig::default(),
    };

    match fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{} Failed to parse config: {}", "Warning:".yellow(), e);
                EngineConfig::default()
            }
        },
        Err(e) => {
            eprintln!("{} Failed to read config: {}", "Warning:".yellow(), e);
            EngineConfig::default()
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref());
    if let Some(rate) = cli.rate_spot {
        config.rate_spot = rate;
    }
    if let Some(rate) = cli.rate_remote {
        config.rate_remote = rate;
    }

    if cli.verbose {
        println!(
            "{} v{}",
            "trade-recap".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        );
        println!("  {} {}", "Spot rate:".bold(), config.rate_spot);
        println!("  {} {}", "Remote rate:".bold(), config.rate_remote);
        println!();
    }

    if let Err(e) = run(&cli, config) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: EngineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();

    println!("{}", "Loading JISDOR rates...".cyan().bold());
    let engine = RecapEngine::from_rate_file(config, &cli.rates)?;
    if let Some((first, last)) = engine.rates().date_range() {
        println!(
            "  {} {} rates, {} to {}",
            "✓".green(),
            engine.rates().len(),
            first,
            last
        );
    }

    println!("{}", "Processing trade files...".cyan().bold());
    let pb = ProgressBar::new(cli.trade_files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let verbose = cli.verbose;
    let run = engine.run(&cli.trade_files, |report: &FileReport| {
        let name = report
            .path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if let Some(error) = &report.error {
            pb.println(format!("  {} {}: {}", "✗".red(), name, error));
        } else if report.trades == 0 {
            pb.println(format!("  {} {}: no trades", "!".yellow(), name));
        } else if verbose {
            pb.println(format!("  {} {}: {} trades", "✓".green(), name, report.trades));
        }
        pb.set_message(name);
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    println!(
        "  {} {} trades, {} monthly sheet(s), {} file(s) skipped",
        "✓".green(),
        run.trades.len(),
        run.monthly.len(),
        run.files_skipped()
    );

    println!("{}", "Writing workbook...".cyan().bold());
    let report = WorkbookReport::from_run(&run);
    report.write(&cli.output)?;
    println!("  {} {}", "✓".green(), cli.output.display());

    if let Some(json_path) = &cli.summary_json {
        write_summary_json(report.summary(), json_path)?;
        println!("  {} {}", "✓".green(), json_path.display());
    }

    if verbose {
        println!();
        println!("  {} {}", "Sheets:".bold(), report.sheet_names().join(", "));
    }
    println!();
    println!(
        "{} in {:.2}s",
        "Done".green().bold(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}
