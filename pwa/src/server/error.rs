use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::{builder, fs};

pub struct Error(Box<dyn std::error::Error + Send + Sync>);

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[cfg(feature = "tracing")]
        tracing::error!(error = %self.0, error.source = ?self.0.source(), "Internal server error");

        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}

impl<E> From<E> for Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Error(Box::new(err))
    }
}

impl From<Error> for Response {
    fn from(err: Error) -> Self {
        err.into_response()
    }
}

impl IntoResponse for fs::Error {
    fn into_response(self) -> Response {
        match self {
            fs::Error::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            fs::Error::PermissionDenied(_) => StatusCode::FORBIDDEN.into_response(),
            err => Error::from(err).into_response(),
        }
    }
}

impl IntoResponse for builder::Error {
    fn into_response(self) -> Response {
        match self {
            builder::Error::ConfigurationInvalid(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "Rejected lifecycle event");

                (StatusCode::BAD_REQUEST, err.to_string()).into_response()
            }
            builder::Error::Io(err) => err.into_response(),
            err => Error::from(err).into_response(),
        }
    }
}
