use serde::{Deserialize, Serialize};

use super::entities::TeacherRole;
use crate::models::common::PaginationQuery;

// 教师查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherListParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub verified: Option<bool>,
    /// 姓氏前缀
    pub search: Option<String>,
}

impl TeacherListParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            size: self.size,
        }
    }
}

// 教师创建请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub role: TeacherRole,
    #[serde(default)]
    pub verified: bool,
    pub middle_name: Option<String>,
    pub contact_number: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
}

// 教师更新请求，只写入提供的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<TeacherRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

// 审核状态更新
#[derive(Debug, Clone, Deserialize)]
pub struct SetVerifiedRequest {
    pub verified: bool,
}
