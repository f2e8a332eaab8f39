use serde::{Deserialize, Serialize};

// 班级
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub strand: String,
    pub year_level: u32,
    /// 已分配科目 ID（由分配引擎维护的反向索引）
    #[serde(default)]
    pub subject_ids: Vec<String>,
    /// 班主任教师 ID，移除后为 null
    #[serde(default)]
    pub adviser_id: Option<String>,
}
