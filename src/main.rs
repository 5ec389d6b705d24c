use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use nihongo_quiz::Config;
use nihongo_quiz::config::{DEFAULT_BASE_URL, Latency, SourceKind};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Where questions come from
    #[arg(short, long, value_enum, default_value_t = SourceKind::Fixture)]
    source: SourceKind,

    /// Base URL of the content service (remote source)
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory with JSON files replacing the bundled datasets (fixture source)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Lower bound of the simulated gateway latency
    #[arg(long, default_value_t = 300)]
    latency_min_ms: u64,

    /// Upper bound of the simulated gateway latency
    #[arg(long, default_value_t = 800)]
    latency_max_ms: u64,

    /// Log file; the terminal belongs to the UI
    #[arg(long, default_value = "nihongo-quiz.log")]
    log_file: PathBuf,
}

fn init_tracing(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(&args.log_file) {
        eprintln!("Cannot open log file {}: {}", args.log_file.display(), e);
        std::process::exit(1);
    }

    let config = Config {
        source: args.source,
        base_url: args.base_url,
        data_dir: args.data_dir,
        latency: Latency::from_millis(args.latency_min_ms, args.latency_max_ms),
        ..Config::default()
    };

    if let Err(e) = nihongo_quiz::run(config).await {
        tracing::error!(error = %e, "quiz exited with an error");
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
