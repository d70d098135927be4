use std::sync::LazyLock;

use minijinja::Environment;
use serde::Serialize;

// Auto-escaping follows the template name: `.js` renders values as JSON
// literals, `.html` escapes them as HTML.
static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Template {
    ServiceWorker,
    Head,
    #[cfg_attr(not(feature = "server"), allow(dead_code))]
    Page,
}

impl Template {
    fn name(self) -> &'static str {
        match self {
            Template::ServiceWorker => "serviceWorker.js",
            Template::Head => "head.html",
            Template::Page => "page.html",
        }
    }

    fn source(self) -> &'static str {
        match self {
            Template::ServiceWorker => include_str!("templates/serviceWorker.js"),
            Template::Head => include_str!("templates/head.html"),
            Template::Page => include_str!("templates/page.html"),
        }
    }
}

pub(crate) fn render<S: Serialize>(template: Template, ctx: S) -> Result<String, minijinja::Error> {
    ENV.render_named_str(template.name(), template.source(), ctx)
}
