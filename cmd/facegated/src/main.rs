//! facegated - face login server.
//!
//! Serves two decoupled surfaces over one session registry:
//!
//! - `POST /api/login/submit` and `POST /api/login/image/{session_id}`:
//!   submission endpoints that evaluate an embedding or image and publish
//!   the decision.
//! - `GET /ws/login/{session_id}`: the realtime channel a client opens to
//!   wait for that decision.

mod server;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use facegate_embedding::{EmbeddingError, FaceEmbedder, RemoteEmbedder};
use facegate_gallery::{GalleryRecord, MemoryGallery, DEFAULT_ACCEPT_THRESHOLD};
use facegate_login::LoginCoordinator;
use facegate_session::SessionRegistry;

/// Face login server.
#[derive(Parser, Debug)]
#[command(name = "facegated")]
#[command(about = "Face login server: match submissions against the gallery and notify realtime clients")]
struct Args {
    /// Listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: String,

    /// Cosine similarity acceptance threshold
    #[arg(long, default_value_t = DEFAULT_ACCEPT_THRESHOLD)]
    threshold: f32,

    /// Seconds a realtime channel waits for a result before timing out
    #[arg(long, default_value_t = 120)]
    wait_timeout: u64,

    /// Base URL of the face embedding inference service
    #[arg(long)]
    embedder_url: Option<String>,

    /// JSON file of gallery records to load at startup
    #[arg(long)]
    gallery: Option<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Stands in when no inference service is configured: image logins fail
/// with a decode error, vector logins still work.
struct UnconfiguredEmbedder;

#[async_trait::async_trait]
impl FaceEmbedder for UnconfiguredEmbedder {
    async fn embed(&self, _image: &[u8]) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Decode(
            "no inference service configured (--embedder-url)".to_string(),
        ))
    }
}

fn load_gallery(path: Option<&PathBuf>) -> Result<MemoryGallery> {
    let Some(path) = path else {
        return Ok(MemoryGallery::new());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading gallery file {}", path.display()))?;
    let records: Vec<GalleryRecord> =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(MemoryGallery::from_records(records))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let gallery = load_gallery(args.gallery.as_ref())?;
    tracing::info!(records = gallery.len(), "gallery loaded");

    let embedder: Arc<dyn FaceEmbedder> = match args.embedder_url.as_deref() {
        Some(url) => Arc::new(RemoteEmbedder::new(url)),
        None => Arc::new(UnconfiguredEmbedder),
    };

    let registry = Arc::new(SessionRegistry::new());
    let coordinator = Arc::new(
        LoginCoordinator::new(Arc::new(gallery), embedder, registry.clone())
            .with_threshold(args.threshold),
    );

    server::serve(
        &args.addr,
        coordinator,
        registry,
        Duration::from_secs(args.wait_timeout),
    )
    .await
}
