use thiserror::Error;

/// Failure modes a booking tool can signal.
///
/// `Validation` covers bad caller input (missing group id, malformed date,
/// out-of-range count) and is always surfaced to the user as natural
/// language. `Execution` covers fulfillment failures. Neither is fatal to
/// the process; the dispatcher converts both into a single-turn response.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ToolError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Execution(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }
}
