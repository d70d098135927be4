use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid manifest path {path:?}: {reason}")]
pub struct InvalidManifestPath {
    path: String,
    reason: &'static str,
}

/// Checks that a manifest path stays inside the storage root.
///
/// The path must be relative and must not contain `..` segments.
pub fn check_manifest_path(path: &str) -> Result<&str, InvalidManifestPath> {
    let invalid = |reason| InvalidManifestPath {
        path: path.to_string(),
        reason,
    };

    if path.is_empty() {
        return Err(invalid("empty path"));
    }

    if path.starts_with(['/', '\\']) || path.contains(':') {
        return Err(invalid("absolute path"));
    }

    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(invalid("parent directory segment"));
    }

    Ok(path)
}

/// Options the manifest and service worker are rendered from.
///
/// Every field has a default, so a partial (or empty) configuration
/// document deserializes into a complete value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub name_of_file: String,
    pub dir: String,
    pub lang: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub scope: String,
    pub icons: Vec<IconSpec>,
    pub display: String,
    pub orientation: String,
    pub start_url: String,
    pub themecolor: String,
    pub related_applications: String,
    pub prefer_related_applications: bool,
    pub backgroundcolor: String,
    #[serde(alias = "includeserviceworkers")]
    pub include_service_worker: bool,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name_of_file: DEFAULT_MANIFEST_FILE.to_string(),
            dir: "ltr".to_string(),
            lang: "en".to_string(),
            name: String::new(),
            short_name: String::new(),
            description: "Description of Application".to_string(),
            scope: String::new(),
            icons: Vec::new(),
            display: "Standalone".to_string(),
            orientation: "Any".to_string(),
            start_url: "/".to_string(),
            themecolor: "#eee".to_string(),
            related_applications: String::new(),
            prefer_related_applications: false,
            backgroundcolor: String::new(),
            include_service_worker: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct IconSpec {
    #[serde(default)]
    pub src: String,
    #[serde(default, alias = "size", deserialize_with = "first_of")]
    pub sizes: String,
    #[serde(default, rename = "type", deserialize_with = "first_of")]
    pub type_: String,
}

impl IconSpec {
    pub fn new(
        src: impl Into<String>,
        sizes: impl Into<String>,
        type_: impl Into<String>,
    ) -> Self {
        Self {
            src: src.into(),
            sizes: sizes.into(),
            type_: type_.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

// Icon sub-forms may store single-choice fields as one-element lists.
fn first_of<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => value,
        OneOrMany::Many(values) => values.into_iter().next().unwrap_or_default(),
    })
}

#[derive(Error, Debug)]
#[error("Invalid site URL {url:?}: {reason}")]
pub struct InvalidSiteUrl {
    url: String,
    reason: String,
}

/// The deployment the artifacts are generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    cache_namespace: String,
}

impl Site {
    pub fn new(cache_namespace: impl Into<String>) -> Self {
        Self {
            cache_namespace: cache_namespace.into(),
        }
    }

    /// Derives the service worker cache namespace from the host of the site root URL.
    pub fn from_root_url(url: &str) -> Result<Self, InvalidSiteUrl> {
        let invalid = |reason: String| InvalidSiteUrl {
            url: url.to_string(),
            reason,
        };

        let uri: http::Uri = url
            .parse()
            .map_err(|err: http::uri::InvalidUri| invalid(err.to_string()))?;
        let host = uri
            .host()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid("missing host".to_string()))?;

        Ok(Self::new(host))
    }

    pub fn cache_namespace(&self) -> &str {
        &self.cache_namespace
    }
}
