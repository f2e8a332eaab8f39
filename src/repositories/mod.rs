//! 实体仓储层
//!
//! 每个顶层集合一个仓储，只做单文档读写，不涉及跨文档不变量。
//! 删除教师、科目、班级会影响关联记录，由 `services::cascade` 负责。

pub mod scores;
pub mod sections;
pub mod students;
pub mod subjects;
pub mod teachers;

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::store::{CollectionPath, DocPath, Document, DocumentStore, TransactionOptions};

pub use scores::ScoreRepository;
pub use sections::SectionRepository;
pub use students::StudentRepository;
pub use subjects::SubjectRepository;
pub use teachers::TeacherRepository;

/// 教师集合
pub const USERS: &str = "users";
pub const SUBJECTS: &str = "subjects";
pub const SECTIONS: &str = "sections";
pub const STUDENTS: &str = "students";
pub const SCORES: &str = "scores";
/// 教师名下的科目关联子集合
pub const TEACHER_SUBJECTS: &str = "subjects";
/// 班级名下的科目关联子集合
pub const SECTION_SUBJECTS: &str = "sectionSubjects";

pub fn teacher_path(teacher_id: &str) -> Result<DocPath> {
    DocPath::root(USERS, teacher_id)
}

pub fn subject_path(subject_id: &str) -> Result<DocPath> {
    DocPath::root(SUBJECTS, subject_id)
}

pub fn section_path(section_id: &str) -> Result<DocPath> {
    DocPath::root(SECTIONS, section_id)
}

pub fn teacher_subjects_path(teacher_id: &str) -> Result<CollectionPath> {
    teacher_path(teacher_id)?.collection(TEACHER_SUBJECTS)
}

pub fn teacher_subject_path(teacher_id: &str, subject_id: &str) -> Result<DocPath> {
    teacher_subjects_path(teacher_id)?.doc(subject_id)
}

pub fn section_subjects_path(section_id: &str) -> Result<CollectionPath> {
    section_path(section_id)?.collection(SECTION_SUBJECTS)
}

pub fn section_subject_path(section_id: &str, subject_id: &str) -> Result<DocPath> {
    section_subjects_path(section_id)?.doc(subject_id)
}

/// 集合组中只保留嵌套在父文档下的记录
///
/// 教师-科目关联子集合与顶层 `subjects` 集合同名，按组读取时需要排除顶层文档。
pub fn nested_only(docs: &[Document]) -> impl Iterator<Item = &Document> {
    docs.iter().filter(|doc| doc.path.parent().parent().is_some())
}

pub(crate) fn decode_all<T: DeserializeOwned>(docs: &[Document]) -> Result<Vec<T>> {
    docs.iter().map(Document::decode).collect()
}

/// 姓氏前缀匹配（区分大小写）
pub(crate) fn has_prefix(value: &str, prefix: &str) -> bool {
    value.starts_with(prefix)
}

/// 全部仓储
#[derive(Clone)]
pub struct Repositories {
    pub teachers: TeacherRepository,
    pub subjects: SubjectRepository,
    pub sections: SectionRepository,
    pub students: StudentRepository,
    pub scores: ScoreRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self {
            teachers: TeacherRepository::new(store.clone()),
            subjects: SubjectRepository::new(store.clone()),
            sections: SectionRepository::new(store.clone()),
            students: StudentRepository::new(store.clone()),
            scores: ScoreRepository::new(store, options),
        }
    }
}
