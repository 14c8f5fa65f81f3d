//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tiny_notes::{NoteStore, NotesConfig, NotesServer, Shutdown};

pub const ADMIN_KEY: &str = "integration-admin-key";

/// A server running on an ephemeral port with its own notes directory.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub dir: TempDir,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn note_file(&self, slug: &str) -> std::path::PathBuf {
        self.dir.path().join("notes").join(format!("{slug}.json"))
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

/// Start a server with `config`, overriding the bind address, notes
/// directory and admin key.
pub async fn spawn_server(mut config: NotesConfig) -> TestServer {
    let dir = TempDir::new().unwrap();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.notes_dir = dir.path().join("notes").to_string_lossy().into_owned();
    config.admin.admin_key = ADMIN_KEY.to_string();

    let store = Arc::new(NoteStore::open(&config.storage.notes_dir).await.unwrap());
    let listener = tiny_notes::net::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = NotesServer::new(config, store);
    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });

    TestServer {
        addr,
        shutdown,
        dir,
        handle,
    }
}

/// Version number embedded in a rendered note page.
pub fn page_version(html: &str) -> u64 {
    let marker = "name=\"version\" value=\"";
    let start = html.find(marker).expect("version input") + marker.len();
    let end = start + html[start..].find('"').expect("closing quote");
    html[start..end].parse().expect("numeric version")
}
