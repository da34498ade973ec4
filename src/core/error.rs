use std::fmt;

/// Validation failures raised by form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    RequiredFields,
    RequiredFieldInteger,
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::RequiredFields => write!(f, "Please fill in all required fields"),
            ClientError::RequiredFieldInteger => write!(f, "Please enter a whole number"),
        }
    }
}

/// Errors surfaced to the user.
/// Everything that reaches the user is wrapped into a notice and enqueued,
/// so each variant knows its own title.
#[derive(Debug, Clone, PartialEq)]
pub enum CommonError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Remote API returned a non-success status.
    Api { status: u16, message: String },
    /// Response body could not be decoded.
    Parse(String),
    /// Invalid user input.
    Client(ClientError),
    Custom(String),
}

impl CommonError {
    pub fn custom(reason: impl Into<String>) -> Self {
        CommonError::Custom(reason.into())
    }

    /// Short heading used when the error is shown as a notice.
    pub fn title(&self) -> &'static str {
        match self {
            CommonError::Network(_) => "Connection Problem",
            CommonError::Api { .. } => "Server Error",
            CommonError::Parse(_) => "Unexpected Response",
            CommonError::Client(_) => "Invalid Input",
            CommonError::Custom(_) => "Error",
        }
    }

    /// Human-readable reason, without the title.
    pub fn reason(&self) -> String {
        match self {
            CommonError::Network(msg) => msg.clone(),
            CommonError::Api { status, message } => format!("HTTP {status}: {message}"),
            CommonError::Parse(msg) => msg.clone(),
            CommonError::Client(e) => e.to_string(),
            CommonError::Custom(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for CommonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommonError::Network(msg) => write!(f, "network error: {msg}"),
            CommonError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            CommonError::Parse(msg) => write!(f, "parse error: {msg}"),
            CommonError::Client(e) => write!(f, "invalid input: {e}"),
            CommonError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CommonError {}

impl From<ClientError> for CommonError {
    fn from(e: ClientError) -> Self {
        CommonError::Client(e)
    }
}
