//! Error types for freshroute

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document {path} is not valid JSON: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to replace {path}: {reason}")]
    Persist { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("No {kind} found with id {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("A {kind} with id {id} already exists")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Package {package_id} is already assigned to route {route_id}")]
    AlreadyAssigned { package_id: String, route_id: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Input closed")]
    InputClosed,
}

impl Error {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn duplicate(kind: &'static str, id: impl Into<String>) -> Self {
        Error::DuplicateId {
            kind,
            id: id.into(),
        }
    }

    /// Errors an interactive session reports and survives
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::DuplicateId { .. }
                | Error::AlreadyAssigned { .. }
                | Error::Validation(_)
                | Error::Export(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
