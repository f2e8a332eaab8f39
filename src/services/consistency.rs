//! 一致性检查与修复
//!
//! 反向索引数组（`teacherIds`、`subjectIds`）是关联记录的物化视图。
//! 检查在一个一致快照上比较二者；修复以关联记录为准重建数组，每个父文档一个事务。

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::Result;
use crate::models::system::entities::{Drift, DriftKind};
use crate::repositories::{
    SECTION_SUBJECTS, SECTIONS, SUBJECTS, TEACHER_SUBJECTS, USERS, nested_only, section_path,
    section_subjects_path, subject_path,
};
use crate::store::{
    CollectionPath, DocPath, Document, DocumentStore, FieldOp, ReadSet, Transaction,
    TransactionOptions, run_transaction,
};

#[derive(Clone)]
pub struct ConsistencyService {
    store: Arc<dyn DocumentStore>,
    options: TransactionOptions,
}

/// 关联记录的 (父文档 ID, 科目 ID)
fn join_key(doc: &Document) -> Option<(String, String)> {
    let owner = doc.path.parent().parent()?;
    Some((owner.id().to_string(), doc.id().to_string()))
}

/// 保留原有顺序，去掉没有关联记录的 ID，再追加缺失的 ID
fn rebuild_ids(current: &[String], truth: &BTreeSet<String>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut ids: Vec<String> = current
        .iter()
        .filter(|id| truth.contains(*id) && seen.insert((*id).clone()))
        .cloned()
        .collect();
    for id in truth {
        if seen.insert(id.clone()) {
            ids.push(id.clone());
        }
    }
    ids
}

impl ConsistencyService {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }

    /// 列出所有不一致，结果有序；空表示一致
    pub async fn audit(&self) -> Result<Vec<Drift>> {
        let users = CollectionPath::root(USERS)?;
        let subjects = CollectionPath::root(SUBJECTS)?;
        let sections = CollectionPath::root(SECTIONS)?;
        let reads = ReadSet::new()
            .collection(users.clone())
            .collection(subjects.clone())
            .collection(sections.clone())
            .group(TEACHER_SUBJECTS)
            .group(SECTION_SUBJECTS);
        let snapshot = self.store.snapshot(&reads).await?;

        let teacher_ids: BTreeSet<&str> = snapshot.children(&users)?.iter().map(Document::id).collect();
        let teacher_joins: BTreeSet<(String, String)> = nested_only(snapshot.group(TEACHER_SUBJECTS)?)
            .filter_map(join_key)
            .collect();
        let section_join_docs = snapshot.group(SECTION_SUBJECTS)?;
        let section_joins: BTreeSet<(String, String)> =
            section_join_docs.iter().filter_map(join_key).collect();

        let mut drifts = Vec::new();

        // 科目 ↔ 教师
        let mut indexed = BTreeSet::new();
        for subject in snapshot.children(&subjects)? {
            for teacher_id in subject.string_array("teacherIds") {
                let key = (teacher_id, subject.id().to_string());
                if !teacher_joins.contains(&key) {
                    drifts.push(Drift {
                        kind: DriftKind::MissingTeacherSubjectJoin,
                        parent: subject.path.to_string(),
                        join: format!("{USERS}/{}/{TEACHER_SUBJECTS}/{}", key.0, key.1),
                    });
                }
                indexed.insert(key);
            }
        }
        for (teacher_id, subject_id) in &teacher_joins {
            if !indexed.contains(&(teacher_id.clone(), subject_id.clone())) {
                drifts.push(Drift {
                    kind: DriftKind::OrphanTeacherSubjectJoin,
                    parent: format!("{SUBJECTS}/{subject_id}"),
                    join: format!("{USERS}/{teacher_id}/{TEACHER_SUBJECTS}/{subject_id}"),
                });
            }
        }

        // 班级 ↔ 科目
        let mut indexed = BTreeSet::new();
        for section in snapshot.children(&sections)? {
            for subject_id in section.string_array("subjectIds") {
                let key = (section.id().to_string(), subject_id);
                if !section_joins.contains(&key) {
                    drifts.push(Drift {
                        kind: DriftKind::MissingSectionSubjectJoin,
                        parent: section.path.to_string(),
                        join: format!("{SECTIONS}/{}/{SECTION_SUBJECTS}/{}", key.0, key.1),
                    });
                }
                indexed.insert(key);
            }
        }
        for join in section_join_docs {
            let Some(key) = join_key(join) else { continue };
            if !indexed.contains(&key) {
                drifts.push(Drift {
                    kind: DriftKind::OrphanSectionSubjectJoin,
                    parent: format!("{SECTIONS}/{}", key.0),
                    join: join.path.to_string(),
                });
            }
            let teacher = join.get_str("subjectTeacherId").unwrap_or_default();
            if !teacher_ids.contains(teacher) {
                drifts.push(Drift {
                    kind: DriftKind::DanglingSubjectTeacher,
                    parent: format!("{SECTIONS}/{}", key.0),
                    join: join.path.to_string(),
                });
            }
        }

        drifts.sort();
        if !drifts.is_empty() {
            warn!("Consistency audit found {} drift(s)", drifts.len());
        }
        Ok(drifts)
    }

    /// 以关联记录为准重建反向索引，返回被修复的父文档数量
    ///
    /// 父文档不存在的孤立关联与指向不存在教师的关联无法通过重建数组修复，
    /// 会在之后的检查中继续出现。
    pub async fn repair(&self) -> Result<usize> {
        let mut repaired = 0;
        for subject in self.store.list(&CollectionPath::root(SUBJECTS)?).await? {
            if self.repair_subject(subject.id()).await? {
                repaired += 1;
            }
        }
        for section in self.store.list(&CollectionPath::root(SECTIONS)?).await? {
            if self.repair_section(section.id()).await? {
                repaired += 1;
            }
        }
        info!("Consistency repair rebuilt {} back-reference array(s)", repaired);
        Ok(repaired)
    }

    async fn repair_subject(&self, subject_id: &str) -> Result<bool> {
        let subject = subject_path(subject_id)?;
        let reads = ReadSet::new().doc(subject.clone()).group(TEACHER_SUBJECTS);
        let committed = run_transaction(self.store.as_ref(), &self.options, &reads, |snapshot, tx| {
            let Some(current) = snapshot.get(&subject)? else {
                return Ok(false);
            };
            let truth: BTreeSet<String> = nested_only(snapshot.group(TEACHER_SUBJECTS)?)
                .filter_map(join_key)
                .filter(|(_, joined)| joined == subject_id)
                .map(|(teacher_id, _)| teacher_id)
                .collect();
            Ok(stage_rebuild(tx, &subject, current, "teacherIds", &truth))
        })
        .await?;
        Ok(committed.value)
    }

    async fn repair_section(&self, section_id: &str) -> Result<bool> {
        let section = section_path(section_id)?;
        let joins = section_subjects_path(section_id)?;
        let reads = ReadSet::new().doc(section.clone()).collection(joins.clone());
        let committed = run_transaction(self.store.as_ref(), &self.options, &reads, |snapshot, tx| {
            let Some(current) = snapshot.get(&section)? else {
                return Ok(false);
            };
            let truth: BTreeSet<String> = snapshot
                .children(&joins)?
                .iter()
                .map(|doc| doc.id().to_string())
                .collect();
            Ok(stage_rebuild(tx, &section, current, "subjectIds", &truth))
        })
        .await?;
        Ok(committed.value)
    }
}

fn stage_rebuild(
    tx: &mut Transaction,
    path: &DocPath,
    current: &Document,
    field: &str,
    truth: &BTreeSet<String>,
) -> bool {
    let existing = current.string_array(field);
    let rebuilt = rebuild_ids(&existing, truth);
    if rebuilt == existing {
        return false;
    }
    let values = rebuilt.into_iter().map(Value::String).collect();
    tx.update(path.clone(), vec![(field.to_string(), FieldOp::Value(Value::Array(values)))]);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{section_subject_path, teacher_path, teacher_subject_path};
    use crate::services::Services;
    use crate::store::Write;
    use crate::store::memory::MemoryStore;
    use serde_json::json;

    fn set(path: DocPath, value: Value) -> Write {
        Write::Set {
            path,
            fields: value
                .as_object()
                .unwrap()
                .iter()
                .map(|(k, v)| (k.clone(), FieldOp::Value(v.clone())))
                .collect(),
        }
    }

    #[test]
    fn test_rebuild_ids_keeps_order() {
        let truth: BTreeSet<String> = ["a", "c", "d"].iter().map(|s| s.to_string()).collect();
        let current = vec!["c".to_string(), "b".to_string(), "c".to_string(), "a".to_string()];
        assert_eq!(rebuild_ids(&current, &truth), vec!["c", "a", "d"]);
    }

    #[tokio::test]
    async fn test_audit_and_repair_drift() {
        let store = Arc::new(MemoryStore::new());
        store
            .apply(vec![
                set(teacher_path("t1").unwrap(), json!({"lastName": "Cruz"})),
                // teacherIds 缺少 t1，且多出没有关联记录的 t9
                set(subject_path("s1").unwrap(), json!({"teacherIds": ["t9"]})),
                set(teacher_subject_path("t1", "s1").unwrap(), json!({"teacherSubjectId": "s1"})),
                set(section_path("sec1").unwrap(), json!({"name": "A", "subjectIds": ["s1"]})),
                set(
                    section_subject_path("sec1", "s2").unwrap(),
                    json!({"subjectTeacherId": "ghost", "sectionId": "sec1"}),
                ),
            ])
            .await
            .unwrap();
        let services = Services::new(store.clone(), TransactionOptions::default());

        let kinds: Vec<DriftKind> = services
            .consistency
            .audit()
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DriftKind::MissingTeacherSubjectJoin,
                DriftKind::OrphanTeacherSubjectJoin,
                DriftKind::MissingSectionSubjectJoin,
                DriftKind::OrphanSectionSubjectJoin,
                DriftKind::DanglingSubjectTeacher,
            ]
        );

        assert_eq!(services.consistency.repair().await.unwrap(), 2);
        let subject = store.get(&subject_path("s1").unwrap()).await.unwrap().unwrap();
        assert_eq!(subject.string_array("teacherIds"), vec!["t1"]);
        let section = store.get(&section_path("sec1").unwrap()).await.unwrap().unwrap();
        assert_eq!(section.string_array("subjectIds"), vec!["s2"]);

        let remaining = services.consistency.audit().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].kind, DriftKind::DanglingSubjectTeacher);
        assert_eq!(services.consistency.repair().await.unwrap(), 0);
    }
}
