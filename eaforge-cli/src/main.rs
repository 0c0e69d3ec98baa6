//! eaforge CLI: compile strategy drafts and presets into specifications.
//!
//! Commands:
//! - `compile`: load a draft or preset, compile, write to stdout or a file
//! - `catalog`: list the derived output catalog and selector candidates
//! - `presets`: list named presets
//! - `template`: print an example draft in TOML

mod logging;
mod sink;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use eaforge_core::{StrategyBuilder, StrategyDraft, StrategyPreset};
use sink::{FileSink, StdoutSink};

#[derive(Parser)]
#[command(
    name = "eaforge",
    about = "eaforge CLI: MetaTrader 5 Expert Advisor specification compiler"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a draft or preset into a specification.
    Compile {
        #[command(flatten)]
        source: SourceArgs,

        /// Write the specification here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List the output catalog and selector candidates of a draft or preset.
    Catalog {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List named presets.
    Presets,
    /// Print an example draft in TOML.
    Template,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Path to a TOML or JSON draft.
    #[arg(long)]
    draft: Option<PathBuf>,

    /// Named preset: rsi_reversal, ma_crossover, bollinger_bounce, macd_momentum, stochastic_oversold.
    #[arg(long)]
    preset: Option<String>,

    /// Override the symbol.
    #[arg(long)]
    symbol: Option<String>,

    /// Override the timeframe.
    #[arg(long)]
    timeframe: Option<String>,

    /// Override the EA name.
    #[arg(long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_json);

    match cli.command {
        Commands::Compile { source, output } => run_compile(source, output),
        Commands::Catalog { source } => run_catalog(source),
        Commands::Presets => {
            run_presets();
            Ok(())
        }
        Commands::Template => run_template(),
    }
}

fn load_builder(source: SourceArgs) -> Result<StrategyBuilder> {
    let mut builder = match (source.draft, source.preset) {
        (Some(_), Some(_)) => bail!("--draft and --preset are mutually exclusive"),
        (None, None) => bail!("one of --draft or --preset is required"),
        (Some(path), None) => {
            let draft = StrategyDraft::from_file(&path)?;
            tracing::info!(path = %path.display(), fingerprint = %draft.fingerprint()?.short(), "draft loaded");
            draft
                .into_builder()
                .with_context(|| format!("replay draft {}", path.display()))?
        }
        (None, Some(name)) => {
            let preset: StrategyPreset = name.parse().map_err(anyhow::Error::msg)?;
            preset.build(preset.default_metadata())?
        }
    };

    let metadata = builder.metadata_mut();
    if let Some(symbol) = source.symbol {
        metadata.symbol = symbol;
    }
    if let Some(timeframe) = source.timeframe {
        metadata.timeframe = timeframe;
    }
    if let Some(name) = source.name {
        metadata.ea_name = name;
    }
    Ok(builder)
}

fn run_compile(source: SourceArgs, output: Option<PathBuf>) -> Result<()> {
    let builder = load_builder(source)?;

    let submission = match output {
        Some(path) => {
            let mut sink = FileSink::new(path);
            let submission = builder.submit(&mut sink);
            let path = sink.finish().context("write specification")?;
            eprintln!("Specification written to: {}", path.display());
            submission
        }
        None => {
            let mut sink = StdoutSink::stdout();
            let submission = builder.submit(&mut sink);
            sink.finish().context("write specification to stdout")?;
            submission
        }
    };

    eprintln!(
        "spec {} ({} bytes)",
        submission.spec_hash.short(),
        submission.byte_len
    );
    Ok(())
}

fn run_catalog(source: SourceArgs) -> Result<()> {
    let builder = load_builder(source)?;

    println!("Output catalog:");
    if builder.catalog().is_empty() {
        println!("  (empty)");
    }
    for entry in builder.catalog().iter() {
        println!("  {}\t{}", entry.id, entry.label);
    }

    let options = builder.options();
    println!("\nSubject candidates:");
    for entry in options.subject() {
        println!("  {}\t{}", entry.id, entry.label);
    }
    println!("\nValue candidates:");
    for entry in options.value() {
        println!("  {}\t{}", entry.id, entry.label);
    }
    Ok(())
}

fn run_presets() {
    println!("{:<22} Description", "Preset");
    println!("{}", "-".repeat(72));
    for preset in StrategyPreset::all() {
        println!("{:<22} {}", preset.name(), preset.description());
    }
}

fn run_template() -> Result<()> {
    let preset = StrategyPreset::BollingerBounce;
    let draft = preset.build(preset.default_metadata())?.to_draft();
    print!("{}", draft.to_toml()?);
    Ok(())
}
