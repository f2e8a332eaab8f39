//! 班级 ↔ 科目分配引擎
//!
//! 关联记录 `sections/{sectionId}/sectionSubjects/{subjectId}` 与班级的
//! `subjectIds` 数组总是在同一事务中一起创建、一起删除。

mod assign;
mod change_teacher;
mod get;
mod list;
mod remove;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::SectionSubject;
use crate::store::{DocumentStore, TransactionOptions};

#[derive(Clone)]
pub struct SectionSubjectService {
    store: Arc<dyn DocumentStore>,
    options: TransactionOptions,
}

impl SectionSubjectService {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }

    /// 为班级分配科目及授课教师
    ///
    /// 关联记录已存在时返回 `AlreadyAssigned`，事务中止，`subjectIds` 保持不变。
    pub async fn assign(
        &self,
        section_id: &str,
        subject_id: &str,
        teacher_id: &str,
    ) -> Result<SectionSubject> {
        assign::assign(self, section_id, subject_id, teacher_id).await
    }

    /// 从班级移除科目，关联记录不存在时同样成功
    ///
    /// 返回关联记录在移除前是否存在。
    pub async fn remove(&self, section_id: &str, subject_id: &str) -> Result<bool> {
        remove::remove(self, section_id, subject_id).await
    }

    /// 更换授课教师，只改写关联记录
    pub async fn change_teacher(
        &self,
        section_id: &str,
        subject_id: &str,
        teacher_id: &str,
    ) -> Result<SectionSubject> {
        change_teacher::change_teacher(self, section_id, subject_id, teacher_id).await
    }

    /// 班级的全部科目关联，按分配时间排序
    pub async fn list(&self, section_id: &str) -> Result<Vec<SectionSubject>> {
        list::list(self, section_id).await
    }

    pub async fn get(&self, section_id: &str, subject_id: &str) -> Result<SectionSubject> {
        get::get(self, section_id, subject_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::section_path;
    use crate::store::memory::MemoryStore;
    use crate::store::{DocPath, FieldOp, Write};

    async fn setup() -> (Arc<MemoryStore>, SectionSubjectService) {
        let store = Arc::new(MemoryStore::new());
        store
            .apply(vec![Write::Set {
                path: section_path("sec1").unwrap(),
                fields: vec![
                    ("id".into(), FieldOp::value("sec1")),
                    ("name".into(), FieldOp::value("Grade 10 - A")),
                    ("subjectIds".into(), FieldOp::Value(serde_json::json!([]))),
                ],
            }])
            .await
            .unwrap();
        let service = SectionSubjectService::new(store.clone(), TransactionOptions::default());
        (store, service)
    }

    async fn subject_ids(store: &MemoryStore) -> Vec<String> {
        store
            .get(&section_path("sec1").unwrap())
            .await
            .unwrap()
            .unwrap()
            .string_array("subjectIds")
    }

    #[tokio::test]
    async fn test_assign_creates_join_and_index() {
        let (store, service) = setup().await;
        let join = service.assign("sec1", "s1", "t1").await.unwrap();
        assert_eq!(join.section_name, "Grade 10 - A");

        let stored = service.get("sec1", "s1").await.unwrap();
        assert_eq!(stored, join);
        assert_eq!(subject_ids(&store).await, vec!["s1"]);
    }

    #[tokio::test]
    async fn test_second_assign_is_rejected_without_side_effects() {
        let (store, service) = setup().await;
        service.assign("sec1", "s1", "t1").await.unwrap();
        let err = service.assign("sec1", "s1", "t2").await.unwrap_err();
        assert_eq!(err.code(), "E001");
        assert_eq!(subject_ids(&store).await, vec!["s1"]);
        assert_eq!(service.get("sec1", "s1").await.unwrap().subject_teacher_id, "t1");
    }

    #[tokio::test]
    async fn test_assign_to_missing_section() {
        let (store, service) = setup().await;
        let err = service.assign("ghost", "s1", "t1").await.unwrap_err();
        assert_eq!(err.code(), "E004");
        let join = DocPath::root("sections", "ghost")
            .and_then(|p| p.child("sectionSubjects", "s1"))
            .unwrap();
        assert!(store.get(&join).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_ids_fail_fast() {
        let (_store, service) = setup().await;
        assert_eq!(service.assign("sec1", "", "t1").await.unwrap_err().code(), "E002");
        assert_eq!(service.assign("sec1", "s1", "").await.unwrap_err().code(), "E002");
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (store, service) = setup().await;
        service.assign("sec1", "s1", "t1").await.unwrap();
        assert!(service.remove("sec1", "s1").await.unwrap());
        assert!(!service.remove("sec1", "s1").await.unwrap());
        assert!(subject_ids(&store).await.is_empty());
        assert_eq!(service.get("sec1", "s1").await.unwrap_err().code(), "E004");
    }

    #[tokio::test]
    async fn test_change_teacher() {
        let (_store, service) = setup().await;
        let err = service.change_teacher("sec1", "s1", "t2").await.unwrap_err();
        assert_eq!(err.code(), "E004");

        service.assign("sec1", "s1", "t1").await.unwrap();
        let changed = service.change_teacher("sec1", "s1", "t2").await.unwrap();
        assert_eq!(changed.subject_teacher_id, "t2");
        assert_eq!(service.list("sec1").await.unwrap(), vec![changed]);
    }
}
