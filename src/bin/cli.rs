//! walkv CLI
//!
//! Command-line interface for creating, writing and inspecting walkv logs.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use walkv::{Config, KvStore};

/// walkv CLI
#[derive(Parser, Debug)]
#[command(name = "walkv")]
#[command(about = "Durable key-value store backed by an append-only log")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty store and print its log path
    New {
        /// Directory to create the log in
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Log filename prefix
        #[arg(short, long, default_value = Config::DEFAULT_LOG_PREFIX)]
        prefix: String,
    },

    /// Set a key-value pair
    Put {
        /// Path to the log file
        #[arg(short, long)]
        log: PathBuf,

        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Get a value by key
    Get {
        /// Path to the log file
        #[arg(short, long)]
        log: PathBuf,

        /// The key to get
        key: String,
    },

    /// Print every key and its current value
    Dump {
        /// Path to the log file
        #[arg(short, long)]
        log: PathBuf,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,walkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}

fn run(command: Commands) -> walkv::Result<()> {
    match command {
        Commands::New { dir, prefix } => {
            let config = Config::builder().log_dir(dir).log_prefix(prefix).build();
            let store = KvStore::create(&config)?;
            println!("{}", store.log_path().display());
            store.close()
        }
        Commands::Put { log, key, value } => {
            let mut store = KvStore::recreate(&log)?;
            store.put(key, value)?;
            store.close()
        }
        Commands::Get { log, key } => {
            let store = KvStore::recreate(&log)?;
            match store.get(&key) {
                Some(value) => println!("{}", value),
                None => {
                    tracing::info!(key = %key, "key not found");
                    process::exit(2);
                }
            }
            store.close()
        }
        Commands::Dump { log } => {
            let store = KvStore::recreate(&log)?;
            let mut entries: Vec<_> = store.iter().collect();
            entries.sort_unstable();
            for (key, value) in entries {
                println!("{}\t{}", key, value);
            }
            store.close()
        }
    }
}
