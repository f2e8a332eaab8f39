use serde::{Deserialize, Serialize};

use crate::models::gradebook::Gradebook;

// 成绩记录：学生、科目、班级与教师-科目关联的扁平化组合
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    #[serde(default)]
    pub id: String,
    pub student_id: String,
    pub student_last_name: String,
    pub student_first_name: String,
    pub student_gender: String,

    pub subject_id: String,
    pub subject_name: String,
    #[serde(default)]
    pub subject_track: String,

    pub section_id: String,
    pub section_name: String,

    /// 授课教师 ID（对应关联记录 users/{teacherSubjectId}/subjects/{subjectId}）
    pub teacher_subject_id: String,

    pub semester: String,

    #[serde(flatten)]
    pub gradebook: Gradebook,

    #[serde(rename = "Initial_Grade", default)]
    pub initial_grade: f64,
    #[serde(rename = "Final_Grade", default)]
    pub final_grade: f64,
}
