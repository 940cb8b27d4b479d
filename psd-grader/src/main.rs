//! psd-grader - piano sheet difficulty grader
//!
//! Scans a sheet library, grades each PDF as Easy, Medium or Hard, and
//! optionally moves documents into the tier folder matching their grade.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use psd_common::config::{
    default_config_path, load_toml_config, write_toml_config, RootFolderResolver, TomlConfig,
};
use psd_common::logging::init_tracing;
use psd_grader::config::{load_scoring_table, max_concurrency, source_tier, starter_config};
use psd_grader::extractors::PdfTextExtractor;
use psd_grader::models::{BatchReport, FailurePolicy, ScoreReport};
use psd_grader::scoring::DifficultyScorer;
use psd_grader::services::{apply_plan, plan_moves, score_document, BatchScorer, LibraryScanner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Reasons shown per document in the scan listing
const LISTED_REASONS: usize = 2;

#[derive(Debug, Parser)]
#[command(name = "psd-grader", version, about = "Grade piano sheet PDFs by difficulty")]
struct Args {
    /// Library root (overrides PSD_ROOT_FOLDER, PSD_ROOT and the config file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Config file (default: <config dir>/psd/config.toml)
    #[arg(long, env = "PSD_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// What to do with documents whose text cannot be read
    #[arg(long, value_enum, default_value_t = OnError::Easy, global = true)]
    on_error: OnError,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Grade the library and print the results
    Scan {
        /// Print the JSON report instead of the summary
        #[arg(long)]
        json: bool,

        /// Also write the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Grade documents in every tier folder, not just the source tier
        #[arg(long)]
        all_tiers: bool,
    },

    /// Grade the library and move documents into their tier folder
    Move {
        /// Perform the moves (otherwise only print the plan)
        #[arg(long)]
        apply: bool,

        #[arg(long)]
        all_tiers: bool,
    },

    /// Grade a single document
    Score {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Write a config file containing the built-in scoring table
    InitConfig {
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnError {
    /// Grade unreadable documents as Easy
    Easy,
    /// Leave unreadable documents out
    Skip,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Easy => FailurePolicy::TreatAsEasy,
            OnError::Skip => FailurePolicy::Skip,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // init-config must work even when the existing config is broken
    let config = match &args.command {
        Command::InitConfig { .. } => TomlConfig::default(),
        _ => load_config(args.config.as_deref())?,
    };

    init_tracing(&config.logging, args.verbose).context("Failed to initialize logging")?;

    info!(
        "psd-grader v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing documents in progress");
            signal_token.cancel();
        }
    });

    match &args.command {
        Command::Scan {
            json,
            output,
            all_tiers,
        } => {
            let report = grade_library(&args, &config, *all_tiers, cancel).await?;

            if let Some(path) = output {
                let body = serde_json::to_string_pretty(&report)?;
                std::fs::write(path, body)
                    .with_context(|| format!("Cannot write report to {}", path.display()))?;
                info!(path = %path.display(), "Wrote JSON report");
            }

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_scan_summary(&report);
            }
        }

        Command::Move { apply, all_tiers } => {
            let report = grade_library(&args, &config, *all_tiers, cancel).await?;
            let plan = plan_moves(&report.documents);

            if plan.is_empty() {
                println!("Every graded document is already in its tier folder.");
                return Ok(());
            }

            println!("{} document(s) to move:", plan.len());
            for planned in &plan.moves {
                println!(
                    "  {} -> {}  {}",
                    planned.current_tier,
                    planned.target_tier,
                    relative(&planned.from, &report.library_root).display()
                );
            }

            if !*apply {
                println!("Dry run, nothing moved. Re-run with --apply to move the files.");
                return Ok(());
            }

            if report.cancelled {
                warn!("Scan was interrupted; moving only the documents that were graded");
            }

            let applied = tokio::task::spawn_blocking(move || apply_plan(&plan))
                .await
                .context("Relocation task failed")?;

            println!(
                "Moved {}, failed {}, removed {} empty folder(s).",
                applied.moved.len(),
                applied.failed.len(),
                applied.pruned.len()
            );
            for (path, error) in &applied.failed {
                println!("  FAILED {}: {}", relative(path, &report.library_root).display(), error);
            }
        }

        Command::Score { file, json } => {
            let table = load_scoring_table(&config)?;
            let policy = FailurePolicy::from(args.on_error);
            let path = file.clone();

            let outcome = tokio::task::spawn_blocking(move || {
                let scorer = DifficultyScorer::with_table(table);
                score_document(&PdfTextExtractor::new(), &scorer, &path)
            })
            .await
            .context("Scoring task failed")?;

            match outcome.resolve(policy) {
                Some(report) if *json => println!("{}", serde_json::to_string_pretty(&report)?),
                Some(report) => print_score_report(file, &report),
                None => println!("{}: skipped (text could not be read)", file.display()),
            }
        }

        Command::InitConfig { path, force } => {
            let path = match path {
                Some(path) => path.clone(),
                None => default_config_path().context("Cannot locate config directory")?,
            };

            if path.exists() && !*force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }

            write_toml_config(&starter_config()?, &path)
                .with_context(|| format!("Cannot write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Ok(path) => path,
            Err(_) => return Ok(TomlConfig::default()),
        },
    };

    load_toml_config(&path).with_context(|| format!("Cannot load config {}", path.display()))
}

async fn grade_library(
    args: &Args,
    config: &TomlConfig,
    all_tiers: bool,
    cancel: CancellationToken,
) -> Result<BatchReport> {
    let root = RootFolderResolver::new()
        .with_cli_arg(args.root.clone())
        .with_toml(config)
        .resolve();

    let tier_filter = if all_tiers {
        None
    } else {
        Some(source_tier(&config.library)?)
    };

    let scanner =
        LibraryScanner::new(root.clone(), config.library.clone()).with_tier_filter(tier_filter);
    let locations = tokio::task::spawn_blocking(move || scanner.discover())
        .await
        .context("Library scan task failed")?
        .with_context(|| format!("Cannot scan library {}", root.display()))?;

    let scorer = DifficultyScorer::with_table(load_scoring_table(config)?);
    let batch = BatchScorer::new(Arc::new(PdfTextExtractor::new()), Arc::new(scorer))
        .with_policy(args.on_error.into())
        .with_max_concurrency(max_concurrency(&config.library));

    Ok(batch.run(&root, locations, cancel).await)
}

fn relative<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

fn print_scan_summary(report: &BatchReport) {
    for document in &report.documents {
        let reasons: Vec<&str> = document
            .report
            .reasons
            .iter()
            .take(LISTED_REASONS)
            .map(String::as_str)
            .collect();

        println!(
            "{:<6} {:>2}  {}  ({})",
            document.report.tier,
            document.report.score,
            relative(&document.location.path, &report.library_root).display(),
            reasons.join("; ")
        );
    }

    let histogram = &report.histogram;
    println!();
    println!(
        "Easy: {}  Medium: {}  Hard: {}  (total {})",
        histogram.easy,
        histogram.medium,
        histogram.hard,
        histogram.total()
    );
    if report.extraction_failures > 0 || report.skipped > 0 {
        println!(
            "Unreadable: {}  Skipped: {}",
            report.extraction_failures, report.skipped
        );
    }
    if report.cancelled {
        println!("Scan interrupted before every document was graded.");
    }

    let changes = report.needs_change();
    if changes.is_empty() {
        return;
    }

    println!();
    println!("Needs tier change ({}):", changes.len());
    for document in changes {
        let current = document.current_tier.map(|t| t.as_str()).unwrap_or("?");
        println!(
            "  {} / {}: {} -> {}",
            document.location.category,
            document.location.song,
            current,
            document.suggested_tier()
        );
    }
}

fn print_score_report(file: &Path, report: &ScoreReport) {
    println!("{}", file.display());
    println!("  Tier:  {}", report.tier);
    println!("  Score: {}", report.score);
    println!("  Reasons:");
    for reason in &report.reasons {
        println!("    - {}", reason);
    }
}
