//! Error taxonomy for signature operations and the structured result every
//! public operation returns.

use serde::Serialize;
use thiserror::Error;

use super::types::SigId;

pub type SigResult<T> = std::result::Result<T, SignatureError>;

#[derive(Error, Debug)]
pub enum SignatureError {
    /// Missing/empty required fields, unparseable dates, unknown type at submission.
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    /// Record failed validation on save.
    #[error("{0}")]
    Validation(String),

    /// The operation ran but had nothing to act on (e.g. no highlight on that line).
    #[error("{0}")]
    SoftFailure(String),

    /// Another live record already owns this content hash.
    #[error("A signature with this content already exists: {existing_id}")]
    Duplicate { existing_id: SigId },

    /// The stored record changed since it was loaded.
    #[error("Signature {id} was modified concurrently (loaded revision {expected}, stored revision {actual})")]
    Conflict { id: SigId, expected: u64, actual: u64 },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    PermissionDenied,
    Validation,
    Failed,
    Conflict,
    Storage,
}

impl SignatureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SignatureError::InvalidInput(_) => ErrorKind::InvalidInput,
            SignatureError::NotFound(_) => ErrorKind::NotFound,
            SignatureError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            SignatureError::Validation(_) | SignatureError::Duplicate { .. } => {
                ErrorKind::Validation
            }
            SignatureError::SoftFailure(_) => ErrorKind::Failed,
            SignatureError::Conflict { .. } => ErrorKind::Conflict,
            SignatureError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether re-reading the record and trying again can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SignatureError::Duplicate { .. } | SignatureError::Conflict { .. }
        )
    }
}

/// `{success, message, data}` result handed back to callers.
#[derive(Debug, Clone, Serialize)]
pub struct OpResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> OpResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            kind: None,
            data: Some(data),
        }
    }

    pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            kind: Some(kind),
            data: None,
        }
    }

    /// Attach a message to a successful result.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if self.success {
            self.message = Some(message.into());
        }
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == Some(ErrorKind::NotFound)
    }

    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or(if self.success {
            "OK"
        } else {
            "Operation failed."
        })
    }
}

impl<T> From<SigResult<T>> for OpResult<T> {
    fn from(result: SigResult<T>) -> Self {
        match result {
            Ok(data) => OpResult::ok(data),
            Err(e) => OpResult::fail(e.kind(), e.to_string()),
        }
    }
}
