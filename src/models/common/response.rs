use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::SchoolRecordsError;
use crate::models::ErrorCode;

/// 统一响应信封 `{code, message, data?, timestamp}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    fn envelope(code: ErrorCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, message, Some(data))
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success as i32
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self::envelope(ErrorCode::Success, message, None)
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::envelope(code, message, None)
    }
}

impl From<&SchoolRecordsError> for ApiResponse<()> {
    fn from(err: &SchoolRecordsError) -> Self {
        Self::error_empty(ErrorCode::from(err), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_omits_data() {
        let err = SchoolRecordsError::already_assigned("Teacher t1 is already assigned to subject s1");
        let response = ApiResponse::<()>::from(&err);
        assert!(!response.is_success());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["code"], ErrorCode::AlreadyAssigned as i32);
        assert_eq!(value["message"], "Teacher t1 is already assigned to subject s1");
        assert!(value.get("data").is_none());
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(vec!["s1"], "ok");
        assert!(response.is_success());
        assert_eq!(response.data, Some(vec!["s1"]));
    }
}
