use thiserror::Error;

use crate::errors::AppError;

/// Abstract failure kinds surfaced by the device service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Store error: {0}")]
    Store(#[from] AppError),
}

impl DeviceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeviceError::Validation(_) => ErrorKind::Validation,
            DeviceError::NotFound(_) => ErrorKind::NotFound,
            DeviceError::Conflict(_) => ErrorKind::Conflict,
            DeviceError::Store(_) => ErrorKind::Store,
        }
    }
}

pub type DeviceResult<T> = Result<T, DeviceError>;
