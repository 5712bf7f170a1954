use anyhow::Result;
use axum::Router;
use clap::Parser;
use search_core::{Engine, EngineConfig};
use server::{build_app, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of documents to index at startup
    #[arg(long, default_value = "./data")]
    data: String,
    /// Directory of static front-end files
    #[arg(long, default_value = "./web")]
    web: String,
    /// Optional engine configuration (JSON)
    #[arg(long)]
    config: Option<String>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 9882)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    let engine = Arc::new(Engine::with_config(config));
    let docs = crawler::scan_directory(&args.data);
    let stats = engine.load_documents(docs);
    tracing::info!(documents = stats.documents, terms = stats.terms, data = %args.data, "engine ready");

    let app: Router = build_app(AppState { engine, web_root: PathBuf::from(&args.web) });

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
