use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::gradebook::Gradebook;

/// 教师-科目关联记录，位于 `users/{teacherId}/subjects/{subjectId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSubject {
    /// 科目 ID（同时也是文档 ID）
    pub id: String,
    pub teacher_subject_id: String,
    #[serde(flatten)]
    pub gradebook: Gradebook,
}

/// 班级-科目关联记录，位于 `sections/{sectionId}/sectionSubjects/{subjectId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionSubject {
    /// 科目 ID（同时也是文档 ID）
    pub id: String,
    pub subject_teacher_id: String,
    pub section_id: String,
    pub section_name: String,
    pub assigned_at: DateTime<Utc>,
}
