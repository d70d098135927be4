use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Request, State};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Response};
use http::{StatusCode, header};
use serde::Serialize;

use crate::builder;
use crate::config::ManifestConfig;
use crate::fs::{self, ReadOnlyFilesystem};
use crate::head::{self, Fragment};
use crate::lifecycle::Event;
use crate::server::{Error, Provider};
use crate::service_worker::SERVICE_WORKER_FILE;
use crate::templates::{self, Template};

pub async fn lifecycle<S>(
    State(state): State<S>,
    Json(event): Json<Event>,
) -> Result<&'static str, builder::Error>
where
    S: Provider + Clone + Send + Sync + 'static,
{
    // Held across the storage update so `active` always matches what is stored.
    let mut current = state.active().write().await;

    state.lifecycle().handle(&event).await?;

    let active = match event {
        Event::Enable { config } | Event::Update { config } => Some(config),
        Event::Save {
            config,
            enabled: true,
        } => Some(config),
        Event::Save { enabled: false, .. } | Event::Disable { .. } | Event::Uninstall { .. } => {
            None
        }
        Event::ServiceWorkerChanged { .. } => return Ok("OK"),
    };

    *current = active;

    Ok("OK")
}

#[derive(Debug, Serialize)]
struct Page<'a> {
    title: &'a str,
    lang: &'a str,
    dir: &'a str,
    theme_color: &'a str,
}

impl<'a> From<&'a ManifestConfig> for Page<'a> {
    fn from(config: &'a ManifestConfig) -> Self {
        let title = [&config.name, &config.short_name]
            .into_iter()
            .find(|title| !title.is_empty())
            .map_or("Home", String::as_str);

        Page {
            title,
            lang: &config.lang,
            dir: &config.dir,
            theme_color: &config.themecolor,
        }
    }
}

pub async fn page<S>(State(state): State<S>) -> Result<Html<String>, Error>
where
    S: Provider + Clone + Send + Sync + 'static,
{
    let config = state.active().read().await.clone().unwrap_or_default();

    Ok(Html(templates::render(Template::Page, Page::from(&config))?))
}

pub async fn artifact<S>(
    State(state): State<S>,
    Path(path): Path<String>,
) -> Result<Response, fs::Error>
where
    S: Provider + Clone + Send + Sync + 'static,
{
    let manifest_file = state
        .active()
        .read()
        .await
        .as_ref()
        .map(|config| config.name_of_file.clone());

    // Only the generated artifacts are served, never other files under the root.
    if path != SERVICE_WORKER_FILE && Some(&path) != manifest_file.as_ref() {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let content = state.lifecycle().builder().fs().get(&path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, content_type(&path)),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        content,
    )
        .into_response())
}

fn content_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, extension)| extension) {
        Some("json" | "webmanifest") => "application/manifest+json",
        Some("js") => "text/javascript",
        _ => "application/octet-stream",
    }
}

pub async fn ping() -> impl IntoResponse {
    ([("Cache-Control", "no-cache")], "OK")
}

/// Links the manifest and service worker into every HTML response while the
/// plugin is enabled.
pub async fn inject_head<S>(
    State(state): State<S>,
    request: Request,
    next: Next,
) -> Result<Response, Error>
where
    S: Provider + Clone + Send + Sync + 'static,
{
    let response = next.run(request).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(head::is_html);

    if !is_html {
        return Ok(response);
    }

    let fragment = match state.active().read().await.as_ref() {
        Some(config) => head::render(&Fragment::from(config))?,
        None => return Ok(response),
    };

    let (mut parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;

    let body = match std::str::from_utf8(&bytes) {
        Ok(document) => Body::from(head::inject(document, &fragment)),
        Err(_) => Body::from(bytes),
    };

    parts.headers.remove(header::CONTENT_LENGTH);

    Ok(Response::from_parts(parts, body))
}
