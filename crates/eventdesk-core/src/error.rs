use thiserror::Error;

/// Errors surfaced by the domain services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{field} already exists: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("{entity} does not exist: {key}")]
    Referential { entity: &'static str, key: String },

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Internal error")]
    Internal,
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    pub fn duplicate(field: &'static str, value: impl ToString) -> Self {
        Self::Duplicate {
            field,
            value: value.to_string(),
        }
    }

    pub fn referential(entity: &'static str, key: impl ToString) -> Self {
        Self::Referential {
            entity,
            key: key.to_string(),
        }
    }

    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Whether the caller can fix the failure by changing the payload.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_) | CoreError::Duplicate { .. } | CoreError::Referential { .. }
        )
    }
}

/// Errors reported by a persistence collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// A unique constraint rejected the write. Carries the column name when known.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated")]
    ForeignKeyViolation,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<StorageError> for CoreError {
    /// Plain conversion for reads. Writes go through the services, which
    /// re-classify constraint violations with the payload at hand.
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "storage failure");
        CoreError::Internal
    }
}
