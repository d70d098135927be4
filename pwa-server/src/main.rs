use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use opendal::{Operator, services::Fs};
use pwa::fs::opendal::Filesystem;
use pwa::{Lifecycle, ManifestBuilder, ManifestConfig, Site, server};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Serves the web app manifest and service worker of a site.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "PWA_BIND", default_value = "0.0.0.0:3000")]
    bind: String,

    /// Directory the artifacts are written to
    #[arg(long, env = "PWA_ROOT", default_value = ".")]
    root: String,

    /// Root URL of the site, its host names the service worker cache
    #[arg(long, env = "PWA_SITE_URL", default_value = "http://localhost:3000/")]
    site_url: String,

    /// TOML file with the manifest options
    #[arg(long, env = "PWA_CONFIG")]
    config: Option<PathBuf>,

    /// Build the artifacts from the configuration on startup
    #[arg(long, env = "PWA_ENABLE")]
    enable: bool,
}

#[derive(Debug, Error)]
enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

async fn load_config(path: Option<&Path>) -> Result<ManifestConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(ManifestConfig::default());
    };

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Clone)]
pub struct AppState {
    lifecycle: Arc<Lifecycle<Filesystem>>,
    active: Arc<RwLock<Option<ManifestConfig>>>,
}

impl AppState {
    pub fn new(lifecycle: Lifecycle<Filesystem>, active: Option<ManifestConfig>) -> Self {
        Self {
            lifecycle: Arc::new(lifecycle),
            active: Arc::new(RwLock::new(active)),
        }
    }
}

impl server::Provider for AppState {
    type Fs = Filesystem;

    fn lifecycle(&self) -> &Lifecycle<Self::Fs> {
        &self.lifecycle
    }

    fn active(&self) -> &RwLock<Option<ManifestConfig>> {
        &self.active
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = load_config(args.config.as_deref()).await?;
    let site = Site::from_root_url(&args.site_url)?;

    let operator = Operator::new(Fs::default().root(&args.root))?.finish();
    let lifecycle = Lifecycle::new(ManifestBuilder::new(Filesystem::new(operator)), site);

    let active = if args.enable {
        lifecycle.on_enable(&config).await?;
        Some(config)
    } else {
        None
    };

    let app = server::router(AppState::new(lifecycle, active));

    let listener = tokio::net::TcpListener::bind(&args.bind).await?;

    tracing::info!(
        address = %listener.local_addr()?,
        root = %args.root,
        "Listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}
