use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use kerpic::library::Library;

use super::routes::router;
use super::types::AppState;

#[derive(Parser)]
#[command(name = "kerpic-server")]
#[command(about = "Serves a photo directory to kerpic clients", long_about = None)]
struct Args {
    /// Directory holding the photo library
    #[arg(long, env = "PHOTOS_DIR", default_value = "./photos")]
    photos_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "KERPIC_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    kerpic::logging::init_stderr();

    if !args.photos_dir.is_dir() {
        anyhow::bail!("photos dir {} is not a directory", args.photos_dir.display());
    }
    let state = Arc::new(AppState::new(Library::new(args.photos_dir.clone())));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    tracing::info!(
        addr = %local_addr,
        photos = %args.photos_dir.display(),
        "kerpic-server listening"
    );

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
