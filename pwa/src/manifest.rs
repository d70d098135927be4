use bytes::Bytes;
use serde::Serialize;

use crate::config::{IconSpec, ManifestConfig};

/// The web app manifest document.
///
/// Field order is the key order of the rendered JSON. Empty strings and
/// empty icon lists are left out of the output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Manifest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub lang: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scope: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub icons: Vec<IconSpec>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub display: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub orientation: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub start_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub theme_color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub related_applications: String,
    pub prefer_related_applications: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub background_color: String,
}

impl From<&ManifestConfig> for Manifest {
    fn from(config: &ManifestConfig) -> Self {
        Manifest {
            lang: config.lang.clone(),
            dir: config.dir.clone(),
            name: config.name.clone(),
            short_name: config.short_name.clone(),
            description: config.description.clone(),
            scope: config.scope.clone(),
            icons: config.icons.clone(),
            display: config.display.clone(),
            orientation: config.orientation.clone(),
            start_url: config.start_url.clone(),
            theme_color: config.themecolor.clone(),
            related_applications: config.related_applications.clone(),
            prefer_related_applications: config.prefer_related_applications,
            background_color: config.backgroundcolor.clone(),
        }
    }
}

pub fn render(config: &ManifestConfig) -> serde_json::Result<Bytes> {
    serde_json::to_vec(&Manifest::from(config)).map(Bytes::from)
}
