use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, SchoolRecordsError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 保留的 `__xxx__` 形式 ID
static RESERVED_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__.*__$").expect("Invalid reserved id regex"));

const MAX_ID_BYTES: usize = 1500;

/// 校验必填 ID，空字符串视为缺失
pub fn require_id<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(SchoolRecordsError::missing_required_field(format!(
            "{field} is required"
        )));
    }
    Ok(value)
}

/// 校验文档 ID / 集合 ID 是否可以作为路径段
pub fn validate_document_id(field: &str, value: &str) -> Result<()> {
    require_id(field, value)?;
    if value.contains('/') {
        return Err(SchoolRecordsError::validation(format!(
            "{field} '{value}' must not contain '/'"
        )));
    }
    if value == "." || value == ".." || RESERVED_ID_RE.is_match(value) {
        return Err(SchoolRecordsError::validation(format!(
            "{field} '{value}' is reserved"
        )));
    }
    if value.len() > MAX_ID_BYTES {
        return Err(SchoolRecordsError::validation(format!(
            "{field} exceeds {MAX_ID_BYTES} bytes"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}
