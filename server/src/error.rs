use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::path::PathBuf;

use crate::models::MessageResponse;

/// Failure of the external shortening provider. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request to shortening provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("shortening provider answered with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("shortening provider returned an empty short url")]
    EmptyResponse,
}

/// Failure to read or rewrite the mapping file. Malformed content is not an
/// error; it is read back as an empty mapping.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cannot access mapping file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot encode mappings: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("url is empty")]
    InvalidInput,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput => StatusCode::CONFLICT,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client. Storage details stay in the server log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Storage(_) => "storage error".to_owned(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(MessageResponse {
                message: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(AppError::InvalidInput.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::from(ProviderError::EmptyResponse).status(),
            StatusCode::BAD_GATEWAY
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert_eq!(
            AppError::from(StorageError::io("/nope/url_database.txt", io)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_input_message_is_stable() {
        assert_eq!(AppError::InvalidInput.to_string(), "url is empty");
    }

    #[test]
    fn storage_details_are_not_sent_to_clients() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = AppError::from(StorageError::io("/data/urls.json", io));
        assert_eq!(err.public_message(), "storage error");
        assert_eq!(AppError::InvalidInput.public_message(), "url is empty");
    }

    #[test]
    fn storage_message_names_the_file() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let msg = StorageError::io("/data/urls.json", io).to_string();
        assert!(msg.contains("/data/urls.json"), "{msg}");
        assert!(msg.contains("read-only"), "{msg}");
    }
}
