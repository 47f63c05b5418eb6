use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The run request body was missing, not JSON, or too large.
    Validation,
    LaunchFailed,
}

/// JSON body of every non-2xx reply from `/scraper`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_in_snake_case() {
        let body = serde_json::to_value(ApiError::new(ErrorCode::LaunchFailed, "no such file"))
            .expect("serialize api error");
        assert_eq!(
            body,
            serde_json::json!({ "code": "launch_failed", "message": "no such file" })
        );
    }
}
