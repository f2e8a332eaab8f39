use serde::Deserialize;

// 新建成绩记录所需的初始信息
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialScoreDetails {
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

    pub teacher_subject_id: String,

    pub semester: String,
}

// 成绩查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreListParams {
    pub student_id: Option<String>,
    pub section_id: Option<String>,
}
