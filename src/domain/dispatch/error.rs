use crate::utils::AppError;

/// Why processing a single inbound event failed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The second word of the message is not a known command
    #[error("{0} is not a valid action")]
    InvalidCommand(String),
    /// The action ran and returned an error
    #[error("{0}")]
    Handler(#[from] AppError),
    /// The action succeeded but the success reaction could not be added
    #[error("could not acknowledge message: {0}")]
    Acknowledge(AppError),
    /// The interactivity payload could not be decoded
    #[error("invalid interaction payload: {0}")]
    MalformedPayload(String),
}

impl DispatchError {
    /// Text posted to the audit channel, tagged with the originating user
    pub fn audit_text(&self, user_id: &str) -> String {
        match self {
            DispatchError::InvalidCommand(_) => format!("<@{}>: {}", user_id, self),
            _ => format!("<@{}>: an exception occurred - {}", user_id, self),
        }
    }
}
