use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use super::credentials::API_KEY_HEADER;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Any method other than GET; nothing upstream is touched.
    #[error("Method not allowed")]
    MethodNotAllowed,
    #[error("Linear API key required")]
    Unauthorized,
    #[error("Failed to fetch Linear issues")]
    Upstream(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.to_string();
        let (status, body) = match self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody {
                    error,
                    message: None,
                    details: None,
                },
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    error,
                    message: Some(format!(
                        "Please provide your Linear API key in the {API_KEY_HEADER} header or Authorization header"
                    )),
                    details: None,
                },
            ),
            ApiError::Upstream(err) => {
                error!(error = %format!("{err:#}"), "Error fetching Linear issues");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error,
                        message: None,
                        details: Some(format!("{err:#}")),
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
