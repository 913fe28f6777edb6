use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError(message.into())
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ApiError::NotFound(format!("{entity} {id}"))
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors.to_string())
    }
}

/// Raised by an update whose row no longer carries the hash and audit log id
/// it was loaded with.
#[derive(Error, Debug)]
#[error("Concurrent update detected on {entity} {id}")]
pub struct ConcurrentUpdate {
    pub entity: &'static str,
    pub id: Uuid,
}

impl ConcurrentUpdate {
    pub fn new(entity: &'static str, id: Uuid) -> Self {
        Self { entity, id }
    }
}

/// Repositories report failures as boxed errors. A lost concurrent update is
/// a conflict; everything else surfaces as a database error.
impl From<Box<dyn std::error::Error + Send + Sync>> for ApiError {
    fn from(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match error.downcast::<ConcurrentUpdate>() {
            Ok(conflict) => ApiError::Conflict(conflict.to_string()),
            Err(other) => ApiError::DatabaseError(other.to_string()),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => ApiError::NotFound("row not found".to_string()),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
