//! Success envelope shared by every handler.

use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_only_response_omits_data() {
        let json = serde_json::to_value(ApiResponse::message("password_changed")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "password_changed");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_response_with_data() {
        let response = ApiResponse::with_message(42, "profile_found");
        assert!(response.success);
        assert_eq!(response.data, Some(42));
        assert_eq!(response.message.as_deref(), Some("profile_found"));
    }
}
