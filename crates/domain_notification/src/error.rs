//! Notification errors

use thiserror::Error;

use core_kernel::PortError;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(#[source] PortError),
}

impl From<PortError> for NotificationError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => NotificationError::NotFound(id),
            other => NotificationError::Storage(other),
        }
    }
}
