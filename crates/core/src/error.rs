/// Domain error taxonomy shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A gallery rule rejected the operation; no state was changed.
    #[error("{0}")]
    InvariantViolation(String),

    /// The media provider failed. The message is surfaced verbatim.
    #[error("{0}")]
    ExternalStore(String),

    /// The unit of work could not be committed. Callers may retry.
    #[error("{0}")]
    Persistence(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a missing member.
    pub fn member_not_found(username: &str) -> Self {
        Self::NotFound {
            entity: "Member",
            key: username.to_string(),
        }
    }

    /// Shorthand for a photo that is not in the caller's gallery.
    pub fn photo_not_found(photo_id: crate::types::DbId) -> Self {
        Self::NotFound {
            entity: "Photo",
            key: photo_id.to_string(),
        }
    }
}
