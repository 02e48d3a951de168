use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::db::StoreError;
use crate::models::Client;

/// Label placed under `error` whenever the store fails.
pub const DATABASE_ERROR: &str = "Database error";

/// JSON object wrapping a response payload.
///
/// Only the keys that are set are serialized, so the same type covers the
/// success bodies (`mensaje` + `cliente`), the validation body (`errors`) and
/// the storage failure body (`error` + `mensaje`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "mensaje", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub client: Option<Client>,
}

impl Envelope {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_client(message: impl Into<String>, client: Client) -> Self {
        Self {
            message: Some(message.into()),
            client: Some(client),
            ..Self::default()
        }
    }
}

/// Everything a handler can answer with besides success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Payload failed the field rules; one line per violation
    Validation(Vec<String>),
    NotFound(String),
    /// The store refused the write on an integrity rule
    Constraint(Vec<String>),
    /// Any other store failure, with its cause
    Storage(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConstraintViolation(violations) => Self::Constraint(violations),
            StoreError::Storage(cause) => Self::Storage(cause),
        }
    }
}

/// A body that is not JSON or does not fit the payload shape is answered
/// like any other invalid payload.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![rejection.body_text()])
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Constraint(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_envelope(self) -> Envelope {
        match self {
            Self::Validation(errors) => Envelope {
                errors: Some(errors),
                ..Envelope::default()
            },
            Self::NotFound(message) => Envelope::message(message),
            Self::Constraint(violations) => Envelope {
                error: Some(DATABASE_ERROR.to_string()),
                message: Some(format!("[{}]", violations.join(", "))),
                ..Envelope::default()
            },
            Self::Storage(cause) => Envelope {
                error: Some(DATABASE_ERROR.to_string()),
                message: Some(cause),
                ..Envelope::default()
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Storage(cause) = &self {
            error!("Store failure: {}", cause);
        }
        (status, Json(self.into_envelope())).into_response()
    }
}
