use axum::{
    extract::rejection::FormRejection,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;
use tracing::error;

use crate::server::pages;

#[derive(Debug, ThisError)]
pub enum VoeError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VoeError {
    pub fn status(&self) -> StatusCode {
        match self {
            VoeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            VoeError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            VoeError::NotFound => StatusCode::NOT_FOUND,
            VoeError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            VoeError::Storage(_)
            | VoeError::DatabaseError(_)
            | VoeError::RactorError(_)
            | VoeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing description. Internal details stay in the logs.
    fn public_description(&self) -> String {
        match self {
            VoeError::BadRequest(reason) => reason.to_lowercase(),
            VoeError::RateLimited(reason) => reason.clone(),
            VoeError::NotFound => "the requested url was not found on the server".to_string(),
            VoeError::MethodNotAllowed => {
                "the method is not allowed for the requested url".to_string()
            }
            VoeError::Storage(_)
            | VoeError::DatabaseError(_)
            | VoeError::RactorError(_)
            | VoeError::Config(_) => "the server failed to complete the request".to_string(),
        }
    }
}

impl From<FormRejection> for VoeError {
    fn from(rejection: FormRejection) -> Self {
        VoeError::BadRequest(format!("malformed vote form: {rejection}"))
    }
}

impl IntoResponse for VoeError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return (
                status,
                [(CONTENT_TYPE, "text/plain; charset=utf-8")],
                format!("too many requests : {}", self.public_description()),
            )
                .into_response();
        }

        let summary = status
            .canonical_reason()
            .unwrap_or("error")
            .to_lowercase();
        (
            status,
            pages::error_page(status.as_u16(), &summary, &self.public_description()),
        )
            .into_response()
    }
}
