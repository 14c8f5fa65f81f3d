//! Tiny Notes server
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 TINY NOTES                   │
//!                        │                                              │
//!     Browser            │  ┌─────────┐    ┌─────────┐    ┌──────────┐  │
//!     ───────────────────┼─▶│   net   │───▶│  http   │───▶│  notes   │  │
//!                        │  │listener │    │ router  │    │  store   │──┼──▶ notes/*.json
//!     ◀──────────────────┼──│  / tls  │◀───│ + pages │◀───│ + notify │  │
//!                        │  └─────────┘    └─────────┘    └──────────┘  │
//!                        │                                              │
//!                        │  ┌──────────┐ ┌──────────┐ ┌──────────────┐  │
//!                        │  │  config  │ │ security │ │ observability│  │
//!                        │  └──────────┘ └──────────┘ └──────────────┘  │
//!                        │  ┌────────────────────────────────────────┐  │
//!                        │  │   lifecycle: storage checks, shutdown  │  │
//!                        │  └────────────────────────────────────────┘  │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use tiny_notes::config::{self, NotesConfig};
use tiny_notes::lifecycle::{prepare_storage, signals, Shutdown};
use tiny_notes::net::{self, tls};
use tiny_notes::observability::{logging, metrics};
use tiny_notes::{NoteStore, NotesServer};

#[derive(Parser)]
#[command(name = "tiny-notes")]
#[command(about = "Self-hosted markdown notes", long_about = None)]
struct Args {
    /// Optional TOML config file; NOTES_* variables override it
    #[arg(short, long, env = "NOTES_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = config::load(args.config.as_deref())?;

    logging::init(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tiny-notes starting");

    if config.admin.is_default_key() {
        tracing::warn!("Admin key is the built-in default; set NOTES_ADMIN_KEY before exposing this server");
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        notes_dir = %config.storage.notes_dir,
        workers = config.runtime.workers,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.runtime.workers)
        .enable_all()
        .build()?;

    runtime.block_on(serve(config))
}

async fn serve(config: NotesConfig) -> Result<(), Box<dyn Error>> {
    prepare_storage(&config.storage)?;
    let store = Arc::new(NoteStore::open(&config.storage.notes_dir).await?);

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::shutdown_signal().await;
        shutdown.trigger();
    });

    let tls_config = config.listener.tls.clone();
    let server = NotesServer::new(config, store);

    match tls_config {
        Some(tls_config) => {
            let rustls = tls::from_config(&tls_config).await?;
            server.run_tls(rustls, rx).await?;
        }
        None => {
            let listener = net::bind(&server.config().listener).await?;
            server.run(listener, rx).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
