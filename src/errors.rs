//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_records_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SchoolRecordsError {
            $($variant(String),)*
        }

        impl SchoolRecordsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolRecordsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolRecordsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolRecordsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SchoolRecordsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolRecordsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_records_errors! {
    AlreadyAssigned("E001", "Already Assigned"),
    MissingRequiredField("E002", "Missing Required Field"),
    StoreTransactionConflict("E003", "Store Transaction Conflict"),
    NotFound("E004", "Resource Not Found"),
    Validation("E005", "Validation Error"),
    DatabaseConfig("E006", "Database Configuration Error"),
    DatabaseConnection("E007", "Database Connection Error"),
    DatabaseOperation("E008", "Database Operation Error"),
    Serialization("E009", "Serialization Error"),
    StoragePluginNotFound("E010", "Storage Plugin Not Found"),
    FileOperation("E011", "File Operation Error"),
}

impl SchoolRecordsError {
    /// 是否为事务冲突（可由调用方重试）
    pub fn is_conflict(&self) -> bool {
        matches!(self, SchoolRecordsError::StoreTransactionConflict(_))
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for SchoolRecordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolRecordsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SchoolRecordsError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolRecordsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SchoolRecordsError {
    fn from(err: std::io::Error) -> Self {
        SchoolRecordsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SchoolRecordsError {
    fn from(err: serde_json::Error) -> Self {
        SchoolRecordsError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolRecordsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchoolRecordsError::already_assigned("test").code(), "E001");
        assert_eq!(
            SchoolRecordsError::missing_required_field("test").code(),
            "E002"
        );
        assert_eq!(
            SchoolRecordsError::store_transaction_conflict("test").code(),
            "E003"
        );
        assert_eq!(SchoolRecordsError::validation("test").code(), "E005");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SchoolRecordsError::already_assigned("test").error_type(),
            "Already Assigned"
        );
        assert_eq!(
            SchoolRecordsError::not_found("test").error_type(),
            "Resource Not Found"
        );
    }

    #[test]
    fn test_conflict_is_retryable() {
        assert!(SchoolRecordsError::store_transaction_conflict("busy").is_conflict());
        assert!(!SchoolRecordsError::already_assigned("dup").is_conflict());
    }

    #[test]
    fn test_format_simple() {
        let err = SchoolRecordsError::already_assigned("s1 is already assigned to sec1");
        let formatted = err.format_simple();
        assert!(formatted.contains("Already Assigned"));
        assert!(formatted.contains("s1 is already assigned to sec1"));
    }
}
