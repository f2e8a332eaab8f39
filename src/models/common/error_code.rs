use serde::{Deserialize, Serialize};

use crate::errors::SchoolRecordsError;

/// API 响应码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    MissingRequiredField = 1001,
    ValidationFailed = 1002,
    NotFound = 1004,
    InternalServerError = 1500,

    // 关联错误 2xxx
    AlreadyAssigned = 2001,
    TransactionConflict = 2002,

    // 存储错误 3xxx
    StorageError = 3000,
    ConsistencyDriftDetected = 3001,
}

impl From<&SchoolRecordsError> for ErrorCode {
    fn from(err: &SchoolRecordsError) -> Self {
        match err {
            SchoolRecordsError::AlreadyAssigned(_) => ErrorCode::AlreadyAssigned,
            SchoolRecordsError::MissingRequiredField(_) => ErrorCode::MissingRequiredField,
            SchoolRecordsError::Validation(_) => ErrorCode::ValidationFailed,
            SchoolRecordsError::NotFound(_) => ErrorCode::NotFound,
            SchoolRecordsError::StoreTransactionConflict(_) => ErrorCode::TransactionConflict,
            SchoolRecordsError::DatabaseConfig(_)
            | SchoolRecordsError::DatabaseConnection(_)
            | SchoolRecordsError::DatabaseOperation(_)
            | SchoolRecordsError::StoragePluginNotFound(_) => ErrorCode::StorageError,
            SchoolRecordsError::Serialization(_) | SchoolRecordsError::FileOperation(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}
