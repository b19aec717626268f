use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// Carries the entity name, e.g. `NotFound("Order")`.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
