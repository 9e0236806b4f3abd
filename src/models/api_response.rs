use serde::{Deserialize, Serialize};

/// JSON envelope wrapping every HTTP response body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: Option<T>, error: Option<String>) -> Self {
        Self {
            success: error.is_none(),
            data,
            error,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn no_data() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}
