// src/error/types.rs
use crate::domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Caller handed the engine something it must reject at the boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// The collection collaborator could not produce a snapshot
    #[error("Collection snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The view engine task is no longer running
    #[error("Library view engine stopped")]
    EngineStopped,

    #[error("Resource not found")]
    NotFound,

    #[error("Other error: {0}")]
    Other(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for AppError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        AppError::EngineStopped
    }
}

pub type AppResult<T> = Result<T, AppError>;
