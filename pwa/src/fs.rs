use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[cfg(feature = "opendal")]
pub mod opendal;

#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {0}")]
    NotFound(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

#[async_trait]
pub trait ReadOnlyFilesystem {
    async fn get(&self, path: &str) -> Result<Bytes>;
}

#[async_trait]
pub trait WritableFilesystem {
    /// Writes `data` at `path`, replacing any previous content.
    async fn put(&self, path: &str, data: Bytes) -> Result<()>;

    /// Removes `path`. Removing a path that does not exist is not an error.
    async fn delete(&self, path: &str) -> Result<()>;
}

pub trait ReadWriteFilesystem: ReadOnlyFilesystem + WritableFilesystem {}
impl<T: ReadOnlyFilesystem + WritableFilesystem> ReadWriteFilesystem for T {}
