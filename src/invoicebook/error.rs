use crate::model::RecordId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`crate::store::line_store::LineStore`].
///
/// Each variant is as specific as the failing precondition allows; the
/// repository layer decides which of them to wrap.
#[derive(Error, Debug)]
pub enum LineStoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Can't delete a line in an empty file: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The single error kind repository callers see.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("{message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RepositoryError {
    pub(crate) fn failed<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RepositoryError::OperationFailed {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Wraps a line store failure, letting argument rejections through unchanged.
    pub(crate) fn from_store(message: impl Into<String>, err: LineStoreError) -> Self {
        match err {
            LineStoreError::InvalidArgument(msg) => RepositoryError::InvalidArgument(msg),
            other => RepositoryError::failed(message, other),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Incorrect iban number: {0}")]
    InvalidAccountNumber(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config error: {0}")]
    Load(#[from] confique::Error),
}

/// Errors surfaced by the [`crate::service::InvoiceBook`] facade.
#[derive(Error, Debug)]
pub enum BookError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
pub type LineResult<T> = std::result::Result<T, LineStoreError>;
