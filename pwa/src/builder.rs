use bytes::Bytes;
use thiserror::Error;

use crate::config::{InvalidManifestPath, ManifestConfig, Site, check_manifest_path};
use crate::fs::{self, ReadWriteFilesystem};
use crate::service_worker::SERVICE_WORKER_FILE;
use crate::{manifest, service_worker};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Io(#[from] fs::Error),
}

impl From<InvalidManifestPath> for Error {
    fn from(err: InvalidManifestPath) -> Self {
        Error::ConfigurationInvalid(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Renders the manifest and service worker and keeps them in storage.
///
/// Writes overwrite the previous artifact and deletes of missing artifacts
/// succeed, so every build and delete can be repeated.
pub struct ManifestBuilder<F> {
    fs: F,
}

impl<F> ManifestBuilder<F>
where
    F: ReadWriteFilesystem + Send + Sync,
{
    pub fn new(fs: F) -> Self {
        Self { fs }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn render_manifest(&self, config: &ManifestConfig) -> Result<Bytes> {
        manifest::render(config).map_err(|err| Error::ConfigurationInvalid(err.into()))
    }

    /// Writes the manifest at `path`, which must stay inside the storage root.
    pub async fn write_manifest(&self, path: &str, content: Bytes) -> Result<()> {
        self.fs.put(check_manifest_path(path)?, content).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(path, "Manifest written");

        Ok(())
    }

    pub async fn delete_manifest(&self, path: &str) -> Result<()> {
        self.fs.delete(check_manifest_path(path)?).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(path, "Manifest deleted");

        Ok(())
    }

    pub fn render_service_worker(&self, start_url: &str, cache_namespace: &str) -> Result<Bytes> {
        Ok(service_worker::render(start_url, cache_namespace)?)
    }

    pub async fn write_service_worker(&self, content: Bytes) -> Result<()> {
        self.fs.put(SERVICE_WORKER_FILE, content).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(path = SERVICE_WORKER_FILE, "Service worker written");

        Ok(())
    }

    pub async fn delete_service_worker(&self) -> Result<()> {
        self.fs.delete(SERVICE_WORKER_FILE).await?;

        #[cfg(feature = "tracing")]
        tracing::info!(path = SERVICE_WORKER_FILE, "Service worker deleted");

        Ok(())
    }

    /// Renders the manifest and writes it to `config.name_of_file`.
    pub async fn build_manifest(&self, config: &ManifestConfig) -> Result<()> {
        let content = self.render_manifest(config)?;

        self.write_manifest(&config.name_of_file, content).await
    }

    pub async fn build_service_worker(&self, config: &ManifestConfig, site: &Site) -> Result<()> {
        let content = self.render_service_worker(&config.start_url, site.cache_namespace())?;

        self.write_service_worker(content).await
    }
}
