use serde::{Deserialize, Serialize};

use crate::builder::{ManifestBuilder, Result};
use crate::config::{DEFAULT_MANIFEST_FILE, ManifestConfig, Site};
use crate::fs::ReadWriteFilesystem;

/// Plugin lifecycle notifications delivered by the host.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Enable {
        #[serde(default)]
        config: ManifestConfig,
    },
    Disable {
        #[serde(default = "default_file_name")]
        file_name: String,
    },
    Update {
        #[serde(default)]
        config: ManifestConfig,
    },
    Uninstall {
        #[serde(default = "default_file_name")]
        file_name: String,
    },
    Save {
        #[serde(default)]
        config: ManifestConfig,
        enabled: bool,
    },
    /// Another service worker provider changed state.
    ServiceWorkerChanged {
        #[serde(default)]
        config: ManifestConfig,
    },
}

fn default_file_name() -> String {
    DEFAULT_MANIFEST_FILE.to_string()
}

pub struct Lifecycle<F> {
    builder: ManifestBuilder<F>,
    site: Site,
}

impl<F> Lifecycle<F>
where
    F: ReadWriteFilesystem + Send + Sync,
{
    pub fn new(builder: ManifestBuilder<F>, site: Site) -> Self {
        Self { builder, site }
    }

    pub fn builder(&self) -> &ManifestBuilder<F> {
        &self.builder
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub async fn on_enable(&self, config: &ManifestConfig) -> Result<()> {
        self.builder.build_manifest(config).await?;
        self.builder.build_service_worker(config, &self.site).await
    }

    pub async fn on_disable(&self, file_name: &str) -> Result<()> {
        self.remove(file_name).await
    }

    pub async fn on_update(&self, config: &ManifestConfig) -> Result<()> {
        self.builder.build_manifest(config).await?;
        self.builder.build_service_worker(config, &self.site).await
    }

    pub async fn on_uninstall(&self, file_name: &str) -> Result<()> {
        self.remove(file_name).await
    }

    /// Applies freshly saved plugin options.
    ///
    /// The saved configuration is used even though it may not be the active
    /// one yet. The service worker is only generated when the configuration
    /// asks for it.
    pub async fn on_save(&self, config: &ManifestConfig, enabled: bool) -> Result<()> {
        if !enabled {
            return self.remove(&config.name_of_file).await;
        }

        self.builder.build_manifest(config).await?;

        if config.include_service_worker {
            self.builder.build_service_worker(config, &self.site).await?;
        }

        Ok(())
    }

    pub async fn on_service_worker_changed(&self, config: &ManifestConfig) -> Result<()> {
        self.builder.build_service_worker(config, &self.site).await
    }

    pub async fn handle(&self, event: &Event) -> Result<()> {
        #[cfg(feature = "tracing")]
        tracing::debug!(?event, "Handling lifecycle event");

        match event {
            Event::Enable { config } => self.on_enable(config).await,
            Event::Disable { file_name } => self.on_disable(file_name).await,
            Event::Update { config } => self.on_update(config).await,
            Event::Uninstall { file_name } => self.on_uninstall(file_name).await,
            Event::Save { config, enabled } => self.on_save(config, *enabled).await,
            Event::ServiceWorkerChanged { config } => self.on_service_worker_changed(config).await,
        }
    }

    async fn remove(&self, file_name: &str) -> Result<()> {
        self.builder.delete_manifest(file_name).await?;
        self.builder.delete_service_worker().await
    }
}
