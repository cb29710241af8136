/// Convenience result type used across the crate.
pub type NrtResult<T> = Result<T, NrtError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Simulation truncation and seeks against an empty table are recovered locally and never show
/// up here.
#[derive(thiserror::Error, Debug)]
pub enum NrtError {
    /// Invalid host-provided schedule, scene or option data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The composition runtime was requested before the graphic finished loading.
    #[error("not ready: {0}")]
    NotReady(String),

    /// The composition runtime rejected an operation.
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NrtError {
    /// Build a [`NrtError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`NrtError::NotReady`] value.
    pub fn not_ready(msg: impl Into<String>) -> Self {
        Self::NotReady(msg.into())
    }

    /// Build a [`NrtError::Runtime`] value.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Build a [`NrtError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for [`NrtError::NotReady`].
    pub fn is_not_ready(&self) -> bool {
        matches!(self, Self::NotReady(_))
    }
}

impl From<serde_json::Error> for NrtError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
