//! Links the generated artifacts into rendered HTML documents.

use serde::Serialize;

use crate::config::{IconSpec, ManifestConfig};
use crate::service_worker::SERVICE_WORKER_FILE;
use crate::templates::{self, Template};

const TITLE_END: &str = "</title>";

/// Values rendered into the `<head>` fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub manifest_href: String,
    pub application_name: String,
    pub icons: Vec<IconSpec>,
    pub service_worker: Option<String>,
}

impl From<&ManifestConfig> for Fragment {
    fn from(config: &ManifestConfig) -> Self {
        Fragment {
            manifest_href: config.name_of_file.clone(),
            application_name: config.short_name.clone(),
            icons: config.icons.clone(),
            service_worker: config
                .include_service_worker
                .then(|| SERVICE_WORKER_FILE.to_string()),
        }
    }
}

pub fn render(fragment: &Fragment) -> Result<String, minijinja::Error> {
    templates::render(Template::Head, fragment)
}

/// Inserts `fragment` right after the first `</title>` of `document`.
///
/// Documents without a title are returned unchanged.
pub fn inject(document: &str, fragment: &str) -> String {
    match document.find(TITLE_END) {
        Some(index) => {
            let (head, tail) = document.split_at(index + TITLE_END.len());

            let mut output = String::with_capacity(document.len() + fragment.len());
            output.push_str(head);
            output.push_str(fragment);
            output.push_str(tail);
            output
        }
        None => document.to_string(),
    }
}

/// Only HTML responses get the fragment.
pub fn is_html(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment() -> Fragment {
        Fragment {
            manifest_href: "manifest.json".to_string(),
            application_name: "Example".to_string(),
            icons: vec![IconSpec::new("icon.png", "512x512", "image/png")],
            service_worker: None,
        }
    }

    #[test]
    fn renders_manifest_link_and_fallback_metadata() {
        let html = render(&fragment()).unwrap();

        assert!(html.contains(r#"<link rel="manifest" href="manifest.json">"#));
        assert!(html.contains(r#"<meta name="application-name" content="Example">"#));
        assert!(html.contains(r#"<link rel="icon" sizes="512x512" href="icon.png">"#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn registers_service_worker_when_enabled() {
        let fragment = Fragment {
            service_worker: Some(SERVICE_WORKER_FILE.to_string()),
            ..fragment()
        };

        let html = render(&fragment).unwrap();

        assert!(html.contains(r#".register("serviceWorker.js")"#));
    }

    #[test]
    fn escapes_configured_values() {
        let fragment = Fragment {
            application_name: "<b>Example</b>".to_string(),
            ..fragment()
        };

        let html = render(&fragment).unwrap();

        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;"));
    }

    #[test]
    fn fragment_follows_configuration() {
        let config = ManifestConfig {
            name_of_file: "site.webmanifest".to_string(),
            short_name: "Site".to_string(),
            include_service_worker: true,
            ..Default::default()
        };

        let fragment = Fragment::from(&config);

        assert_eq!(fragment.manifest_href, "site.webmanifest");
        assert_eq!(fragment.application_name, "Site");
        assert_eq!(fragment.service_worker.as_deref(), Some(SERVICE_WORKER_FILE));
    }

    #[test]
    fn inject_places_fragment_after_title() {
        let document = "<html><head><title>Home</title></head><body></body></html>";

        assert_eq!(
            inject(document, "<link rel=\"manifest\">"),
            "<html><head><title>Home</title><link rel=\"manifest\"></head><body></body></html>"
        );
    }

    #[test]
    fn inject_only_touches_first_title() {
        let document = "<title>A</title><svg><title>B</title></svg>";

        assert_eq!(
            inject(document, "!"),
            "<title>A</title>!<svg><title>B</title></svg>"
        );
    }

    #[test]
    fn inject_without_title_is_unchanged() {
        let document = "<html><body></body></html>";

        assert_eq!(inject(document, "<link>"), document);
    }

    #[test]
    fn detects_html_content_types() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("Text/HTML"));
        assert!(!is_html("application/json"));
    }
}
