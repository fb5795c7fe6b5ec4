//! Command-line interface components.

use crate::config::{CompilerConfig, MissingSectionPolicy};
use crate::merge::merge_sections;
use crate::models::{RunSummary, SectionOutcome};
use crate::processor::Pipeline;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "scada-db-compiler")]
#[command(about = "Compile SCADA point inventory tables into a fixed-format master database file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file (defaults to the user config directory)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Increase logging verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every section file from the input tables, then merge them
    Compile(CompileArgs),
    /// Merge existing section files without reading the input tables
    Merge(MergeArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct CompileArgs {
    /// Directory holding the input CSV tables
    #[arg(short, long = "input", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    #[command(flatten)]
    pub merge: MergeArgs,

    /// Skip writing the composite key cross-reference
    #[arg(long)]
    pub no_key_index: bool,
}

#[derive(clap::Args, Debug, Default)]
pub struct MergeArgs {
    /// Directory the section files are written to and merged from
    #[arg(short, long = "sections", value_name = "DIR")]
    pub section_dir: Option<PathBuf>,

    /// Directory for the merged SCADA_<YYMMDD>.dat file
    #[arg(short, long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Generation date stamped into the merged file name (YYYY-MM-DD, default today)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,

    /// What to do when a section file is absent: skip, fail or empty
    #[arg(long = "missing-sections", value_name = "POLICY")]
    pub missing_sections: Option<MissingSectionPolicy>,
}

impl Args {
    /// Log level from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Load the file configuration, if any, and layer the flags over it
    pub fn resolve_config(&self) -> Result<CompilerConfig> {
        let base = match &self.config_file {
            Some(path) => CompilerConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config file {}", path.display()))?,
            None => match CompilerConfig::default_config_path().filter(|path| path.is_file()) {
                Some(path) => CompilerConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load config file {}", path.display()))?,
                None => CompilerConfig::default(),
            },
        };

        let config = match &self.command {
            Commands::Compile(args) => args.apply(base),
            Commands::Merge(args) => args.apply(base),
        };
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }
}

impl CompileArgs {
    pub fn apply(&self, config: CompilerConfig) -> CompilerConfig {
        let mut config = self.merge.apply(config);
        if let Some(dir) = &self.input_dir {
            config = config.with_input_dir(dir);
        }
        if self.no_key_index {
            config = config.without_key_index();
        }
        config
    }
}

impl MergeArgs {
    pub fn apply(&self, mut config: CompilerConfig) -> CompilerConfig {
        if let Some(dir) = &self.section_dir {
            config = config.with_section_dir(dir);
        }
        if let Some(dir) = &self.output_dir {
            config = config.with_output_dir(dir);
        }
        if let Some(date) = self.date {
            config = config.with_generation_date(date);
        }
        if let Some(policy) = self.missing_sections {
            config = config.with_missing_section_policy(policy);
        }
        config
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scada_db_compiler={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the selected command
pub fn run(args: &Args) -> Result<()> {
    let config = args.resolve_config()?;

    match &args.command {
        Commands::Compile(_) => {
            println!("{}", "Compiling SCADA point database".bright_green().bold());
            let summary = Pipeline::new(config)?.run()?;
            print_summary(&summary);
        }
        Commands::Merge(_) => {
            let path = merge_sections(
                &config.section_dir,
                &config.output_dir,
                config.generation_date(),
                config.missing_section_policy,
            )?;
            println!(
                "{} {}",
                "Merged database written to".bright_green(),
                path.display().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Print the end-of-run report
pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", "Compilation Summary".bright_green().bold());
    for (kind, outcome) in &summary.sections {
        match outcome {
            SectionOutcome::Written { path, records } => println!(
                "  {} {} records -> {}",
                format!("{:<8}", kind.to_string()).bright_cyan(),
                records.to_string().bright_white(),
                path.display()
            ),
            SectionOutcome::Failed { reason } => println!(
                "  {} {} {}",
                format!("{:<8}", kind.to_string()).bright_red(),
                "skipped:".bright_red(),
                reason
            ),
        }
    }

    if summary.unresolved_station_refs > 0 {
        println!(
            "  {} {}",
            "Unresolved station references:".bright_yellow(),
            summary.unresolved_station_refs.to_string().bright_yellow().bold()
        );
    }
    if summary.unresolved_state_codes > 0 {
        println!(
            "  {} {}",
            "Status points without state code:".bright_yellow(),
            summary.unresolved_state_codes.to_string().bright_yellow().bold()
        );
    }
    if let Some(path) = &summary.key_index_path {
        println!("  {} {}", "Key index:".bright_cyan(), path.display());
    }
    if let Some(path) = &summary.merged_path {
        println!(
            "  {} {}",
            "Merged file:".bright_cyan(),
            path.display().to_string().bright_white().bold()
        );
    }
    println!(
        "  {} {}ms",
        "Time elapsed:".bright_cyan(),
        summary.processing_time_ms.to_string().bright_white()
    );
}
