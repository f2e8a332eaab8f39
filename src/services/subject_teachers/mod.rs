//! 科目 ↔ 教师分配引擎
//!
//! 关联记录 `users/{teacherId}/subjects/{subjectId}` 保存该教师在此科目下的
//! 成绩册，与科目的 `teacherIds` 数组在同一事务中维护。

mod assign;
mod get;
mod list;
mod remove;
mod update;

use std::sync::Arc;

use crate::errors::Result;
use crate::models::assignments::entities::TeacherSubject;
use crate::models::assignments::requests::TeacherSubjectUpdate;
use crate::store::{DocumentStore, TransactionOptions};

#[derive(Clone)]
pub struct SubjectTeacherService {
    store: Arc<dyn DocumentStore>,
    options: TransactionOptions,
}

impl SubjectTeacherService {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }

    /// 为科目分配教师，并以全 0 成绩册创建关联记录
    pub async fn assign(&self, subject_id: &str, teacher_id: &str) -> Result<TeacherSubject> {
        assign::assign(self, subject_id, teacher_id).await
    }

    /// 从科目移除教师，关联记录不存在时同样成功
    pub async fn remove(&self, subject_id: &str, teacher_id: &str) -> Result<bool> {
        remove::remove(self, subject_id, teacher_id).await
    }

    /// 合并成绩册字段到已有关联记录
    ///
    /// 缺少 ID 返回 `MissingRequiredField`，尚未分配返回 `NotFound`，
    /// 出现非成绩册字段或试图修改 `teacherSubjectId` 返回 `Validation`。
    /// 不修改 `teacherIds`。
    pub async fn update_teacher_subject(
        &self,
        teacher_id: &str,
        update: &TeacherSubjectUpdate,
    ) -> Result<TeacherSubject> {
        update::update_teacher_subject(self, teacher_id, update).await
    }

    /// 教师名下的全部关联记录
    pub async fn list(&self, teacher_id: &str) -> Result<Vec<TeacherSubject>> {
        list::list(self, teacher_id).await
    }

    pub async fn get(&self, teacher_id: &str, subject_id: &str) -> Result<TeacherSubject> {
        get::get(self, teacher_id, subject_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::models::gradebook::{GRADEBOOK_FIELD_COUNT, GRADEBOOK_FIELDS};
    use crate::repositories::{subject_path, teacher_subject_path};
    use crate::store::memory::MemoryStore;
    use crate::store::{FieldOp, Write};

    async fn setup() -> (Arc<MemoryStore>, SubjectTeacherService) {
        let store = Arc::new(MemoryStore::new());
        store
            .apply(vec![Write::Set {
                path: subject_path("s1").unwrap(),
                fields: vec![
                    ("id".into(), FieldOp::value("s1")),
                    ("name".into(), FieldOp::value("Math")),
                    ("teacherIds".into(), FieldOp::Value(serde_json::json!([]))),
                ],
            }])
            .await
            .unwrap();
        let service = SubjectTeacherService::new(store.clone(), TransactionOptions::default());
        (store, service)
    }

    async fn teacher_ids(store: &MemoryStore) -> Vec<String> {
        store
            .get(&subject_path("s1").unwrap())
            .await
            .unwrap()
            .unwrap()
            .string_array("teacherIds")
    }

    fn update(id: &str, fields: &[(&str, f64)]) -> TeacherSubjectUpdate {
        TeacherSubjectUpdate {
            id: id.to_string(),
            teacher_subject_id: None,
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn test_assign_seeds_zero_gradebook() {
        let (store, service) = setup().await;
        service.assign("s1", "t1").await.unwrap();

        let doc = store
            .get(&teacher_subject_path("t1", "s1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get_str("teacherSubjectId"), Some("s1"));
        assert_eq!(doc.data.len(), GRADEBOOK_FIELD_COUNT + 1);
        for field in GRADEBOOK_FIELDS.iter() {
            assert_eq!(doc.data[field.as_str()], serde_json::json!(0.0));
        }
        assert_eq!(teacher_ids(&store).await, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_assign_twice_keeps_single_entry() {
        let (store, service) = setup().await;
        service.assign("s1", "t1").await.unwrap();
        let err = service.assign("s1", "t1").await.unwrap_err();
        assert_eq!(err.code(), "E001");
        assert_eq!(teacher_ids(&store).await, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_assign_to_missing_subject_writes_nothing() {
        let (store, service) = setup().await;
        let err = service.assign("ghost", "t1").await.unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(
            store
                .get(&teacher_subject_path("t1", "ghost").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_remove_twice() {
        let (store, service) = setup().await;
        service.assign("s1", "t1").await.unwrap();
        assert!(service.remove("s1", "t1").await.unwrap());
        assert!(!service.remove("s1", "t1").await.unwrap());
        assert!(teacher_ids(&store).await.is_empty());
        assert!(service.list("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_teacher_subject_merges_fields() {
        let (store, service) = setup().await;
        service.assign("s1", "t1").await.unwrap();
        let updated = service
            .update_teacher_subject("t1", &update("s1", &[("WW1_First", 10.0), ("Exam_First", 50.0)]))
            .await
            .unwrap();
        assert_eq!(updated.gradebook.get("WW1_First"), Some(10.0));
        assert_eq!(updated.gradebook.get("WW2_First"), Some(0.0));

        let stored = service.get("t1", "s1").await.unwrap();
        assert_eq!(stored, updated);
        assert_eq!(teacher_ids(&store).await, vec!["t1"]);
    }

    #[tokio::test]
    async fn test_update_teacher_subject_rejections() {
        let (_store, service) = setup().await;
        let err = service
            .update_teacher_subject("", &update("s1", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E002");
        let err = service
            .update_teacher_subject("t1", &update("", &[]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E002");
        let err = service
            .update_teacher_subject("t1", &update("s1", &[("WW1_First", 1.0)]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");

        service.assign("s1", "t1").await.unwrap();
        let err = service
            .update_teacher_subject("t1", &update("s1", &[("Quiz1", 1.0)]))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E005");

        let mut relink = update("s1", &[]);
        relink.teacher_subject_id = Some("s2".into());
        let err = service.update_teacher_subject("t1", &relink).await.unwrap_err();
        assert_eq!(err.code(), "E005");
    }
}
