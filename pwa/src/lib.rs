pub mod fs;

pub mod builder;
pub mod config;
pub mod head;
pub mod lifecycle;
pub mod manifest;
pub mod service_worker;

mod templates;

#[cfg(feature = "server")]
pub mod server;

pub use builder::ManifestBuilder;
pub use config::{IconSpec, ManifestConfig, Site};
pub use lifecycle::{Event, Lifecycle};
