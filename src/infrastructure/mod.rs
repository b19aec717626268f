pub mod catalog_repo;
pub mod customer_repo;
pub mod feedback_repo;
pub mod models;
pub mod order_repo;
pub mod promotion_repo;

#[cfg(test)]
pub(crate) mod test_support;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::errors::DomainError;

pub use catalog_repo::DieselCatalogRepository;
pub use customer_repo::DieselCustomerRepository;
pub use feedback_repo::DieselFeedbackRepository;
pub use order_repo::DieselOrderRepository;
pub use promotion_repo::DieselPromotionRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, info)
            | DieselError::DatabaseError(DatabaseErrorKind::NotNullViolation, info) => {
                DomainError::InvalidInput(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DomainError::Conflict(info.message().to_string())
            }
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

/// `%term%` for ILIKE, with the LIKE metacharacters escaped.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
