use ::opendal::Operator;
use async_trait::async_trait;
use bytes::Bytes;

use crate::fs::*;

pub struct Filesystem {
    operator: Operator,
}

impl Filesystem {
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

#[async_trait]
impl ReadOnlyFilesystem for Filesystem {
    async fn get(&self, path: &str) -> Result<Bytes> {
        Ok(self.operator.read(path).await?.to_bytes())
    }
}

#[async_trait]
impl WritableFilesystem for Filesystem {
    async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        self.operator.write(path, data).await?;

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        match self.operator.delete(path).await {
            Err(err) if err.kind() != ::opendal::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

impl From<::opendal::Error> for Error {
    fn from(err: ::opendal::Error) -> Self {
        match err.kind() {
            ::opendal::ErrorKind::NotFound => Error::NotFound(err.into()),
            ::opendal::ErrorKind::PermissionDenied => Error::PermissionDenied(err.into()),
            _ => Error::Other(err.into()),
        }
    }
}
