mod analysis_client;
mod config;
mod errors;
mod form;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis_client::HttpAnalysisClient;
use crate::config::Config;
use crate::form::UploadForm;
use crate::models::upload::SelectedFile;
use crate::render::{render_blocks, render_text};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let analyzer = HttpAnalysisClient::new(config.analyze_url.clone(), config.analyze_timeout)?;
    info!(
        "Analysis endpoint: {} (timeout {}s)",
        analyzer.endpoint(),
        config.analyze_timeout.as_secs()
    );

    // `uploader analyze <resume.pdf>` runs one submit and prints the result.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, path] = args.as_slice() {
        if command == "analyze" {
            return analyze_once(&config, &analyzer, Path::new(path)).await;
        }
    }

    info!("Starting resume uploader v{}", env!("CARGO_PKG_VERSION"));

    let state = AppState::new(Arc::new(analyzer), config.clone());

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST and PORT must form a valid socket address")?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// One-shot mode: select the file, submit, print the rendered blocks.
async fn analyze_once(config: &Config, analyzer: &HttpAnalysisClient, path: &Path) -> Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume.pdf".to_string());

    let mut form = UploadForm::new();
    form.select_file(SelectedFile::new(file_name, None, bytes));

    if let Err(e) = form.submit(analyzer).await {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let ui = form.ui_state();
    let blocks = ui
        .result
        .as_ref()
        .map(|result| render_blocks(result, config.extracted_text_policy))
        .unwrap_or_default();
    if blocks.is_empty() {
        println!("The analysis returned no displayable sections.");
    }
    for line in render_text(&blocks) {
        println!("{line}");
    }
    Ok(())
}
