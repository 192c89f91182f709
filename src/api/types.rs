use serde::Serialize;

/// `{"error": {"message": "..."}}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorMessage {
                message: message.into(),
            },
        }
    }
}

/// Body of a 401; a bare string rather than the message envelope.
#[derive(Debug, Serialize)]
pub struct UnauthorizedResponse {
    pub error: &'static str,
}
