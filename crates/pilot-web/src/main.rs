mod error;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pilot_core::config::PilotConfig;
use pilot_core::PilotService;

pub struct AppState {
    pub service: PilotService,
    pub config: PilotConfig,
}

#[derive(Parser)]
#[command(name = "pilot-web", about = "Prompt Pilot web server", version)]
struct Args {
    /// Address to bind (overrides web.host)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides web.port)
    #[arg(long, env = "PORT")]
    port: Option<u16>,
    /// Directory holding the JSON collections (overrides storage.data_dir)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Directory of static assets (overrides web.public_dir)
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Project directory searched for .prompt-pilot/config.toml
    #[arg(long)]
    project_dir: Option<PathBuf>,
}

impl Args {
    fn apply(&self, config: &mut PilotConfig) {
        if let Some(ref host) = self.host {
            config.web.host = host.clone();
        }
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if let Some(ref dir) = self.data_dir {
            config.storage.data_dir = dir.display().to_string();
        }
        if let Some(ref dir) = self.public_dir {
            config.web.public_dir = dir.display().to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("pilot_web=info,pilot_core=info,tower_http=info")
            }),
        )
        .init();

    let args = Args::parse();
    let project_dir = match args.project_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let mut config = PilotConfig::load(Some(project_dir.as_path())).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        PilotConfig::default_config()
    });
    args.apply(&mut config);

    let service = PilotService::from_config(&config);
    let imported = service
        .init()
        .await
        .context("failed to prepare data directory")?;
    if imported > 0 {
        tracing::info!("imported {imported} legacy drafts");
    }

    let public_dir = config.public_dir();
    let addr = format!("{}:{}", config.web.host, config.web.port);
    let state = Arc::new(AppState {
        service,
        config: config.clone(),
    });

    let app = routes::router(&public_dir)
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    tracing::info!(
        "prompt pilot listening on http://{addr} (data: {}, public: {})",
        config.storage.data_dir,
        public_dir.display()
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
