use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog_core::CatalogError;
use tracing::{error, warn};

/// An error on its way out as an HTTP response
#[derive(Debug)]
pub enum ApiError {
    Catalog(CatalogError),
    /// The upload could not be read; the status comes from the multipart layer
    /// (413 when the body limit is exceeded)
    Multipart(MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(err) => match err {
                CatalogError::Validation(_) | CatalogError::InvalidPath(_) => {
                    StatusCode::BAD_REQUEST
                }
                CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
                CatalogError::Conflict(_) => StatusCode::CONFLICT,
                CatalogError::StoreUnavailable(_) | CatalogError::Io(_) | CatalogError::Other(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::Multipart(err) => err.status(),
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Catalog(err) => err.to_string(),
            ApiError::Multipart(err) => format!("malformed form: {}", err.body_text()),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.message();
        if status.is_server_error() {
            error!(error = %msg, "request failed");
        } else {
            warn!(error = %msg, status = status.as_u16(), "request rejected");
        }
        (status, Json(serde_json::json!({"error": msg}))).into_response()
    }
}
