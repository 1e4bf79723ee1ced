use thiserror::Error;

#[derive(Error, Debug)]
pub enum CourtError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid request: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl CourtError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        CourtError::NotFound(format!("{} with ID {} not found", entity, id))
    }

    /// True for errors caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CourtError::Database(_) | CourtError::Internal(_))
    }
}

pub type CourtResult<T> = Result<T, CourtError>;
