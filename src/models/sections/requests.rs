use serde::{Deserialize, Serialize};

use crate::models::common::PaginationQuery;

// 班级查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionListParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub adviser_id: Option<String>,
    pub year_level: Option<u32>,
}

impl SectionListParams {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page,
            size: self.size,
        }
    }
}

// 班级创建请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSectionRequest {
    pub name: String,
    pub strand: String,
    pub year_level: u32,
    pub adviser_id: Option<String>,
}

// 班级更新请求（不含 subjectIds 与 adviserId）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_level: Option<u32>,
}

// 设置班主任
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAdviserRequest {
    pub adviser_id: String,
}
