//! Error taxonomy shared by stores and services.

/// Result type for store and service operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the domain services and storage layer.
///
/// The HTTP layer owns the mapping to status codes; services attach domain
/// context only and never translate store failures into something else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or out-of-range input, rejected before any store access.
    #[error("{0}")]
    Validation(String),

    /// The referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A sale or outbound movement would take stock below zero. The write
    /// is aborted with no partial state.
    #[error("insufficient stock: {available} on hand, {requested} requested")]
    InsufficientStock { available: i64, requested: i64 },

    /// A stored value could not be decoded into its domain type.
    #[error("invalid stored value for {column}: {value}")]
    Corrupted { column: &'static str, value: String },

    /// Failure reported by the store; the enclosing transaction is rolled
    /// back before this propagates.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Error {
    /// Shorthand for a validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a missing row.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}
