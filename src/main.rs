//! The assembly CLI. Point `--config` at a training config with a `datasets` section.
//!
//! `assemble` loads every corpus, splits off the eval set and writes
//! `train.<ext>` and `eval.<ext>` to the output directory. `chars` reports the
//! character inventory of all transcripts, which is what you want to check
//! before fixing a model's character set.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ttsdata::export::{ExportFormat, write_samples};
use ttsdata::{CharCensus, DatasetConfig, FormatterRegistry, load_tts_samples};

const DEFAULT_OUTPUT_DIR: &str = "assembled_dataset";
const BAR_TEMPLATE: &str =
    "{spinner:.green} {prefix:15.bold.dim} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})";

#[derive(Parser, Debug)]
#[command(author, version, about = "TTS corpus assembly", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load all corpora and write the train/eval sample lists
    Assemble(AssembleArgs),
    /// Report the unique characters of all transcripts
    Chars(CharsArgs),
    /// List the built-in formatters
    Formatters,
}

#[derive(Args, Debug)]
struct AssembleArgs {
    /// Config file with a `datasets` section
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// Skip the eval split and write everything to train
    #[arg(long)]
    no_eval: bool,

    /// Formatter to use for the first dataset instead of its registered one
    #[arg(long, value_name = "NAME")]
    formatter: Option<String>,

    /// Output file format
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,

    /// Override the config's split seed
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct CharsArgs {
    /// Config file with a `datasets` section
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Assemble(args) => run_assemble(args),
        Commands::Chars(args) => run_chars(args),
        Commands::Formatters => {
            for name in FormatterRegistry::with_builtins().names() {
                println!("{name}");
            }
            Ok(())
        }
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = match (quiet, verbose) {
        (0, 0) => LevelFilter::Info,
        (0, 1) => LevelFilter::Debug,
        (0, _) => LevelFilter::Trace,
        (1, _) => LevelFilter::Warn,
        _ => LevelFilter::Error,
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn load_config(path: &Path) -> Result<DatasetConfig> {
    DatasetConfig::from_json_file(path)
        .with_context(|| format!("failed to read config {}", path.display()))
}

fn run_assemble(args: AssembleArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut config = load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.split_seed = seed;
    }
    let registry = FormatterRegistry::with_builtins();
    let formatter = args.formatter.as_deref().map(|name| registry.get(name)).transpose()?;

    let m = MultiProgress::new();

    // --- Step 1: Load and split every corpus ---
    let main_pb = m.add(ProgressBar::new_spinner());
    main_pb.set_style(ProgressStyle::default_spinner().template("{spinner:.blue} {msg}")?);
    main_pb.set_message("Step 1: Loading corpora...");

    let loaded = load_tts_samples(&config, &registry, !args.no_eval, formatter)
        .context("failed to load samples")?;
    let Some(train) = loaded.train else {
        bail!("{} declares no datasets", args.config.display());
    };
    main_pb.finish_with_message("Step 1: All corpora loaded.");

    // --- Step 2: Write the sample lists ---
    fs::create_dir_all(&args.out)
        .with_context(|| format!("failed to create {}", args.out.display()))?;
    let mut outputs = vec![("train", train)];
    if let Some(eval) = loaded.eval {
        outputs.push(("eval", eval));
    }

    for (split, samples) in &outputs {
        let path = args.out.join(format!("{split}.{}", args.format.extension()));
        let pb = m.add(ProgressBar::new(samples.len() as u64));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(BAR_TEMPLATE)?
                .progress_chars("#>-"),
        );
        pb.set_prefix(format!("Writing {split}"));
        write_samples(&path, samples, args.format, &pb)
            .with_context(|| format!("failed to write {}", path.display()))?;
        pb.finish();
    }
    m.clear()?;

    println!("\n✅ Assembly complete! Output written to directory '{}'", args.out.display());
    for (split, samples) in &outputs {
        println!("  - {split}: {} samples", samples.len());
    }
    println!("Total time elapsed: {:?}", start_time.elapsed());
    Ok(())
}

fn run_chars(args: CharsArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let registry = FormatterRegistry::with_builtins();
    let loaded =
        load_tts_samples(&config, &registry, false, None).context("failed to load samples")?;
    let Some(samples) = loaded.train else {
        bail!("{} declares no datasets", args.config.display());
    };

    let census = CharCensus::from_samples(&samples);
    println!("{census}");
    Ok(())
}
