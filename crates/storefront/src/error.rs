//! Errors returned by the gallery and admin handlers.
//!
//! Catalog storage failures are reported to Sentry and answered with a bare
//! 500; lookup and validation failures go back to the caller verbatim.
//!
//! Cart operations have no error path here: a duplicate add is a normal
//! response and storage trouble is absorbed by the cart store itself.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::CatalogError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not allowed to use the admin API.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the failure is ours rather than the caller's.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Catalog(err) => err.is_storage(),
            Self::Internal(_) => true,
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Invalid(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Catalog(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    /// Body text for the response. Catalog file paths and io errors stay in
    /// the logs.
    fn client_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront request failed"
            );
        }

        (self.status(), self.client_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor or admin action as a Sentry breadcrumb, so a later
/// catalog failure report shows the cart and catalog steps before it.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("item", "p1_60x40cm")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use galeria_core::{ProductId, ProductValidationError};

    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("size 10x10cm is not offered".to_string());
        assert_eq!(err.to_string(), "Bad request: size 10x10cm is not offered");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_catalog_error_status_codes() {
        assert_eq!(
            get_status(CatalogError::NotFound(ProductId::new("p1")).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(CatalogError::Invalid(ProductValidationError::NoSizes).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(CatalogError::Io(std::io::Error::other("disk full")).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let err: AppError =
            CatalogError::Io(std::io::Error::other("/srv/catalog.json: disk full")).into();
        assert_eq!(err.client_message(), "Internal server error");

        let err = AppError::BadRequest("size 10x10cm is not offered".to_string());
        assert_eq!(
            err.client_message(),
            "Bad request: size 10x10cm is not offered"
        );
    }
}
