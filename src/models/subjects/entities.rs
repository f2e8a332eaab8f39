use serde::{Deserialize, Serialize};

// 科目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub track: String,
    pub semester: String,
    /// 已分配教师 ID（由分配引擎维护的反向索引）
    #[serde(default)]
    pub teacher_ids: Vec<String>,
}
