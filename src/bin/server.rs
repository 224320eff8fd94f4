//! msgstore Server Binary
//!
//! Opens the configured store and starts the TCP server.

use clap::Parser;
use msgstore::network::Server;
use msgstore::{store, Backend, Config, SyncMode};
use tracing_subscriber::{fmt, EnvFilter};

/// msgstore Server
#[derive(Parser, Debug)]
#[command(name = "msgstore-server")]
#[command(about = "Message storage service")]
#[command(version)]
struct Args {
    /// Store engine: memory or durable
    #[arg(short, long, default_value = "durable")]
    backend: Backend,

    /// Database file for the durable engine
    #[arg(short, long, default_value = "./msgstore_data/messages.redb")]
    db_path: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "8")]
    workers: usize,

    /// Skip fsync on commit (durable engine only)
    #[arg(long)]
    eventual_sync: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,msgstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("msgstore Server v{}", msgstore::VERSION);
    tracing::info!("Backend: {}", args.backend);
    if args.backend == Backend::Durable {
        tracing::info!("Database file: {}", args.db_path);
    }

    let config = Config::builder()
        .backend(args.backend)
        .db_path(&args.db_path)
        .sync_mode(if args.eventual_sync {
            SyncMode::Eventual
        } else {
            SyncMode::Immediate
        })
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .build();

    let store = match store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            std::process::exit(1);
        }
    };

    let server = match Server::bind(config, store) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", args.listen, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
