use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::payment::PaymentError;
use crate::validation;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(BTreeMap<String, Vec<String>>),

    #[error("{0}")]
    Conflict(String),

    /// The payment gateway failed or answered with an error status.
    #[error("Payment gateway request failed")]
    Gateway { status: Option<u16>, body: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound(_) => AppError::NotFound(e.to_string()),
            DomainError::InvalidInput(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(e: PaymentError) -> Self {
        match e {
            PaymentError::Domain(d) => d.into(),
            PaymentError::Gateway { status, body } => AppError::Gateway {
                status: Some(status),
                body,
            },
            PaymentError::Http(err) => AppError::Gateway {
                status: err.status().map(|s| s.as_u16()),
                body: err.to_string(),
            },
            e @ PaymentError::Deserialize { .. } => AppError::Gateway {
                status: None,
                body: e.to_string(),
            },
            e @ (PaymentError::Encode(_) | PaymentError::Join(_)) => {
                AppError::Internal(e.to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(validation::flatten(&e))
    }
}

impl From<actix_web::error::BlockingError> for AppError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        AppError::Internal(e.to_string())
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gateway { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(errors) => json!({
                "message": self.to_string(),
                "errors": errors,
            }),
            AppError::Gateway { status, body } => {
                log::error!("payment gateway failure (status {status:?}): {body}");
                json!({
                    "message": self.to_string(),
                    "details": { "status": status, "response": body },
                })
            }
            AppError::Internal(cause) => {
                log::error!("internal error: {cause}");
                json!({ "message": "Internal server error" })
            }
            _ => json!({ "message": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
