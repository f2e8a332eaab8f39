use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 班级分配科目请求
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignSectionSubjectRequest {
    #[serde(default)]
    pub subject_id: String,
    #[serde(default)]
    pub teacher_id: String,
}

/// 更换班级科目的授课教师
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSectionTeacherRequest {
    #[serde(default)]
    pub teacher_id: String,
}

/// 成绩册更新，`id` 为科目 ID，其余数值字段合并进关联记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSubjectUpdate {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_subject_id: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, f64>,
}
