//! ZaloPay integration: signed payment creation, status reconciliation
//! (one-shot delayed recheck, on-demand and batch) and the gateway callback.

pub mod reconciler;
pub mod service;
pub mod zalopay;

use thiserror::Error;

use crate::domain::errors::DomainError;

pub use reconciler::{ReconcileResult, Reconciler, SweepSummary};
pub use service::{CallbackRequest, CallbackResponse, PaymentService, PaymentStarted};
pub use zalopay::{ZaloPayClient, ZaloPayConfig};

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Network, TLS or timeout failure talking to the gateway.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("gateway request failed with HTTP {status}")]
    Gateway { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode gateway payload: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Runs a repository call on the blocking pool.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, PaymentError>
where
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
