use serde::{Deserialize, Serialize};

/// 反向索引与关联记录之间的不一致类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftKind {
    /// subject.teacherIds 含有教师，但关联记录不存在
    MissingTeacherSubjectJoin,
    /// 关联记录存在，但 subject.teacherIds 未包含该教师
    OrphanTeacherSubjectJoin,
    /// section.subjectIds 含有科目，但关联记录不存在
    MissingSectionSubjectJoin,
    /// 关联记录存在，但 section.subjectIds 未包含该科目
    OrphanSectionSubjectJoin,
    /// 班级-科目关联指向不存在的教师
    DanglingSubjectTeacher,
}

impl std::fmt::Display for DriftKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DriftKind::MissingTeacherSubjectJoin => "missing_teacher_subject_join",
            DriftKind::OrphanTeacherSubjectJoin => "orphan_teacher_subject_join",
            DriftKind::MissingSectionSubjectJoin => "missing_section_subject_join",
            DriftKind::OrphanSectionSubjectJoin => "orphan_section_subject_join",
            DriftKind::DanglingSubjectTeacher => "dangling_subject_teacher",
        };
        write!(f, "{name}")
    }
}

/// 一条不一致记录
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drift {
    pub kind: DriftKind,
    /// 持有反向索引的文档（科目或班级）
    pub parent: String,
    /// 关联记录路径
    pub join: String,
}
