pub mod error;
use axum::{Router, middleware, routing};
pub use error::*;
use tokio::sync::RwLock;

use crate::config::ManifestConfig;
use crate::fs::ReadWriteFilesystem;
use crate::lifecycle::Lifecycle;

pub mod routes;

pub trait Provider {
    type Fs: ReadWriteFilesystem + Send + Sync + 'static;

    fn lifecycle(&self) -> &Lifecycle<Self::Fs>;

    /// Configuration of the enabled plugin, `None` while it is disabled.
    fn active(&self) -> &RwLock<Option<ManifestConfig>>;
}

pub fn router<S>(state: S) -> Router
where
    S: Provider + Clone + Send + Sync + 'static,
{
    Router::<S>::new()
        .route("/", routing::get(routes::page::<S>))
        .route("/.lifecycle", routing::post(routes::lifecycle::<S>))
        .route("/.ping", routing::get(routes::ping))
        .route("/{*path}", routing::get(routes::artifact::<S>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::inject_head::<S>,
        ))
        .with_state(state)
}

#[cfg(all(test, feature = "opendal"))]
mod tests {
    use std::sync::Arc;

    use ::opendal::{Operator, services::Memory};
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::builder::ManifestBuilder;
    use crate::config::Site;
    use crate::fs::ReadOnlyFilesystem;
    use crate::fs::opendal::Filesystem;

    #[derive(Clone)]
    struct TestState {
        lifecycle: Arc<Lifecycle<Filesystem>>,
        active: Arc<RwLock<Option<ManifestConfig>>>,
    }

    impl Provider for TestState {
        type Fs = Filesystem;

        fn lifecycle(&self) -> &Lifecycle<Self::Fs> {
            &self.lifecycle
        }

        fn active(&self) -> &RwLock<Option<ManifestConfig>> {
            &self.active
        }
    }

    fn state() -> TestState {
        let op = Operator::new(Memory::default()).unwrap().finish();
        let lifecycle = Lifecycle::new(
            ManifestBuilder::new(Filesystem::new(op)),
            Site::new("example.com"),
        );

        TestState {
            lifecycle: Arc::new(lifecycle),
            active: Arc::new(RwLock::new(None)),
        }
    }

    fn app() -> Router {
        router(state())
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn event(json: &'static str) -> Request<Body> {
        Request::post("/.lifecycle")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json))
            .unwrap()
    }

    #[tokio::test]
    async fn ping() {
        let (status, body) = send(&app(), get("/.ping")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn enable_serves_artifacts_until_disabled() {
        let app = app();

        let (status, _) = send(
            &app,
            event(r#"{"event": "enable", "config": {"name": "Example"}}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, manifest) = send(&app, get("/manifest.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(manifest.contains(r#""name":"Example""#));

        let (status, script) = send(&app, get("/serviceWorker.js")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(script.contains(r#"caches.open("example.com")"#));

        let (status, _) = send(&app, event(r#"{"event": "disable"}"#)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, get("/manifest.json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, get("/serviceWorker.js")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_paths_are_not_served() {
        let app = app();

        send(&app, event(r#"{"event": "enable"}"#)).await;

        let (status, _) = send(&app, get("/Cargo.toml")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn page_links_manifest_only_while_enabled() {
        let app = app();

        let (_, page) = send(&app, get("/")).await;
        assert!(!page.contains(r#"rel="manifest""#));

        send(
            &app,
            event(r#"{"event": "enable", "config": {"short_name": "Example", "include_service_worker": true}}"#),
        )
        .await;

        let (status, page) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(page.contains(r#"<title>Example</title>"#));
        assert!(page.contains(r#"<link rel="manifest" href="manifest.json">"#));
        assert!(page.contains(r#".register("serviceWorker.js")"#));

        send(&app, event(r#"{"event": "uninstall"}"#)).await;

        let (_, page) = send(&app, get("/")).await;
        assert!(!page.contains(r#"rel="manifest""#));
    }

    #[tokio::test]
    async fn malformed_event_is_rejected() {
        let (status, _) = send(&app(), event(r#"{"event": "explode"}"#)).await;

        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn manifest_path_outside_root_is_bad_request() {
        let app = app();

        for json in [
            r#"{"event": "enable", "config": {"name_of_file": "../escaped.json"}}"#,
            r#"{"event": "enable", "config": {"name_of_file": "/manifest.json"}}"#,
            r#"{"event": "disable", "file_name": "../victim.txt"}"#,
        ] {
            let (status, _) = send(&app, event(json)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{json}");
        }

        let (status, _) = send(&app, get("/serviceWorker.js")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn event_waits_for_active_configuration() {
        let state = state();
        let app = router(state.clone());

        let reader = state.active.read().await;

        let pending = tokio::spawn(send_owned(app, event(r#"{"event": "enable"}"#)));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let stored = state.lifecycle.builder().fs().get("manifest.json").await;
        assert!(stored.is_err());

        drop(reader);
        let (status, _) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);

        assert!(state.lifecycle.builder().fs().get("manifest.json").await.is_ok());
        assert!(state.active.read().await.is_some());
    }

    async fn send_owned(app: Router, request: Request<Body>) -> (StatusCode, String) {
        send(&app, request).await
    }
}
