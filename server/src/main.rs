use anyhow::Result;
use axum::Router;
use clap::Parser;
use sift_core::CorpusConfig;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use sift_server::{build_app, ServerConfig};
use tokio::net::TcpListener;

#[derive(Parser)]
struct Args {
    /// Directory of text files to serve
    #[arg(long, default_value = "./corpus")]
    dir: PathBuf,
    /// File extensions to index (repeatable)
    #[arg(long = "ext", default_value = "txt")]
    extensions: Vec<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let corpus = CorpusConfig::new(&args.dir).with_extensions(args.extensions);
    let app: Router = build_app(ServerConfig::from_env(corpus))?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
