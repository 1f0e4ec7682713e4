use anyhow::{Context, Result};
use bible_index_core::config::{self, Settings};
use bible_index_core::pipeline::{self, RunOptions, RunStatus};
use bible_index_core::IndexSchema;
use clap::{Parser, Subcommand};
use cli::overrides::Overrides;
use cli::report;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut cfg = config::load(cli.config.as_deref()).context("load config")?;
    Overrides {
        base_dir: cli.base_dir.clone(),
        output: cli.output.clone(),
        schema: cli.schema,
    }
    .apply(&mut cfg);
    let settings = Settings::from_config(&cfg).context("invalid config")?;
    debug!("resolved settings: {:?}", settings);

    match cli.command {
        Commands::Build { dry_run, json } => run_build(&settings, dry_run, json),
        Commands::Check { json } => run_check(&settings, json),
    }
}

#[derive(Parser)]
#[command(name = "bible-index")]
#[command(about = "Builds index.json for a directory of bible files", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    /// Override the base directory
    #[arg(long, global = true)]
    base_dir: Option<String>,

    /// Override the manifest path (relative to the base directory)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Override the manifest schema: rich|minimal
    #[arg(long, global = true)]
    schema: Option<IndexSchema>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the configured directories and write the manifest
    Build {
        /// Print the manifest instead of writing it
        #[arg(long, default_value_t = false)]
        dry_run: bool,
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Exit non-zero when the manifest on disk is missing or out of date
    Check {
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
}

fn run_build(settings: &Settings, dry_run: bool, json: bool) -> Result<ExitCode> {
    let outcome = pipeline::run(settings, RunOptions { dry_run })
        .with_context(|| format!("build {}", settings.output_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report::build_json(&outcome)?)?);
    } else {
        if outcome.status == RunStatus::DryRun {
            if let Some(manifest) = &outcome.manifest {
                std::io::stdout().write_all(manifest)?;
            }
        }
        println!("{}", report::build_text(&outcome));
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(settings: &Settings, json: bool) -> Result<ExitCode> {
    let outcome = pipeline::check(settings)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report::check_json(&outcome)?)?);
    } else {
        println!("{}", report::check_text(&outcome));
    }
    if report::check_failed(&outcome) {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
