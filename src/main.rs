use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use logxml::{compile_pattern, parse_file, ParserConfig, Result};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input XML log file path
    #[arg(short, long)]
    file: String,

    /// Name of the root element
    #[arg(long, default_value = "events")]
    root: String,

    /// Name of the repeating event element
    #[arg(long, default_value = "event")]
    event: String,

    /// Records per delivered batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Print the value of this field for every decoded event
    #[arg(short = 'k', long)]
    find_key: Option<String>,

    /// Print the first field value matching this regex for every event
    #[arg(short = 'p', long)]
    find_pattern: Option<String>,

    /// Limit printed records
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
}

fn main() {
    // Initialize the default subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false) // Don't show target
        .without_time() // Don't show timestamps
        .init(); // Initialize the subscriber

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let mut config = ParserConfig::new(args.root, args.event);
    if let Some(batch_size) = args.batch_size {
        config = config.with_batch_size(batch_size);
    }

    // Compile once up front; a bad pattern fails before any output.
    let pattern = args.find_pattern.as_deref().map(compile_pattern).transpose()?;

    let collection = parse_file(&args.file, &config)?;
    info!("decoded {} events", collection.len());

    for record in collection.records().iter().take(args.limit) {
        if let Some(key) = &args.find_key {
            println!("#{} {}={}", record.id(), key, record.find_by_key(key));
        } else if let Some(pattern) = &pattern {
            match record.find_matching(pattern) {
                Some(value) => println!("#{} {}", record.id(), value),
                None => println!("#{} <no match>", record.id()),
            }
        } else {
            let fields: Vec<String> = record
                .fields()
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            println!("#{} {}", record.id(), fields.join(" "));
        }
    }

    Ok(())
}
