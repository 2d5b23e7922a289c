use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Builder;
use location_anonymization::config::ConfigBuilder;
use location_anonymization::processor::DefaultProcessor;
use location_anonymization::{Anonymizer, Summary};
use log::{info, Level, LevelFilter};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

const DEFAULT_DATA_FILE: &str = "Items.data";

/// Anonymize location data in a JSON file
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file, a JSON array of records
    #[arg(value_name = "INPUT_PATH", default_value = DEFAULT_DATA_FILE)]
    input: PathBuf,

    /// Output file, overwritten if it exists (may be the input file)
    #[arg(value_name = "OUTPUT_PATH", default_value = DEFAULT_DATA_FILE)]
    output: PathBuf,

    /// Seed for the random coordinate jitter, for reproducible output
    #[arg(short, long, env = "LOCANON_SEED")]
    seed: Option<u64>,

    /// Show more verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn run(anonymizer: &mut Anonymizer, input_path: &Path, output_path: &Path) -> Result<Summary> {
    let input_src = BufReader::new(
        File::open(input_path)
            .with_context(|| format!("failed to open {}", input_path.display()))?,
    );

    // Read everything before the output file is created, as it may be the input file
    let anonymized = anonymizer
        .anonymize(input_src)
        .with_context(|| format!("failed to anonymize {}", input_path.display()))?;

    let output_target = File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path.display()))?;
    anonymized
        .write(output_target)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    info!("wrote {}", output_path.display());

    Ok(Summary::new(
        anonymized.len(),
        anonymizer.processor().config(),
    ))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Error
    };

    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => "Error",
                Level::Warn => "Warning",
                Level::Info => "Info",
                Level::Debug => "Debug",
                Level::Trace => "Trace",
            };
            writeln!(buf, "{}: {}", level, record.args())
        })
        .filter(None, log_level);
    builder.init();

    let mut config_builder = ConfigBuilder::default();
    if let Some(seed) = args.seed {
        config_builder = config_builder.seed(seed);
    }

    let config = config_builder.build();
    let processor = DefaultProcessor::new(config);
    let mut anonymizer = Anonymizer::new(processor);

    let summary = run(&mut anonymizer, &args.input, &args.output)?;

    println!("Anonymized {} items", summary.count);
    println!("Output saved to {}", args.output.display());
    println!(
        "Location range: {:?} to {:?}",
        summary.latitude_start, summary.latitude_end
    );
    println!("All addresses replaced with demo data");

    Ok(())
}
