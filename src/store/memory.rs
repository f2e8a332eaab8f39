//! 内存文档存储
//!
//! 所有文档保存在一个读写锁保护的有序映射中。每次提交分配一个全局递增序号，
//! 被写入的文档以该序号作为新版本，提交时据此检测快照是否过期。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::document::{Document, DocumentData, Write, WriteEffect, apply_write};
use super::path::{CollectionPath, DocPath};
use super::transaction::{CommitResult, ReadSet, Snapshot, listing_fingerprint};
use super::DocumentStore;
use crate::errors::{Result, SchoolRecordsError};

#[derive(Debug, Clone)]
struct StoredDocument {
    data: DocumentData,
    version: u64,
    update_time: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    docs: BTreeMap<DocPath, StoredDocument>,
    sequence: u64,
}

impl MemoryState {
    fn document(&self, path: &DocPath) -> Option<Document> {
        self.docs.get(path).map(|stored| Document {
            path: path.clone(),
            data: stored.data.clone(),
            version: stored.version,
            update_time: stored.update_time,
        })
    }

    fn children(&self, collection: &CollectionPath) -> Vec<Document> {
        self.docs
            .keys()
            .filter(|path| &path.parent() == collection)
            .filter_map(|path| self.document(path))
            .collect()
    }

    fn group(&self, collection_id: &str) -> Vec<Document> {
        self.docs
            .keys()
            .filter(|path| path.collection_id() == collection_id)
            .filter_map(|path| self.document(path))
            .collect()
    }

    /// 快照中的每一项读取都必须与当前状态一致
    fn validate(&self, snapshot: &Snapshot) -> Result<()> {
        for (path, version) in snapshot.doc_reads() {
            let current = self.docs.get(path).map(|d| d.version);
            if current != version {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "{path} changed since it was read"
                )));
            }
        }
        for (path, docs) in snapshot.collection_reads() {
            if listing_fingerprint(&self.children(path)) != listing_fingerprint(docs) {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "collection {path} changed since it was read"
                )));
            }
        }
        for (collection_id, docs) in snapshot.group_reads() {
            if listing_fingerprint(&self.group(collection_id)) != listing_fingerprint(docs) {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "collection group {collection_id} changed since it was read"
                )));
            }
        }
        Ok(())
    }
}

/// 内存存储实现
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前文档总数
    pub async fn len(&self) -> usize {
        self.state.read().await.docs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        Ok(self.state.read().await.document(path))
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        Ok(self.state.read().await.children(collection))
    }

    async fn list_group(&self, collection_id: &str) -> Result<Vec<Document>> {
        Ok(self.state.read().await.group(collection_id))
    }

    async fn snapshot(&self, reads: &ReadSet) -> Result<Snapshot> {
        let state = self.state.read().await;
        let mut snapshot = Snapshot::default();
        for path in &reads.docs {
            snapshot.record_doc(path.clone(), state.document(path));
        }
        for path in &reads.collections {
            snapshot.record_collection(path.clone(), state.children(path));
        }
        for collection_id in &reads.groups {
            snapshot.record_group(collection_id.clone(), state.group(collection_id));
        }
        Ok(snapshot)
    }

    async fn commit(&self, snapshot: &Snapshot, writes: Vec<Write>) -> Result<CommitResult> {
        let mut state = self.state.write().await;
        state.validate(snapshot)?;

        let commit_time = Utc::now();
        if writes.is_empty() {
            return Ok(CommitResult {
                version: state.sequence,
                commit_time,
            });
        }

        // 先在暂存区计算全部效果，任何写入失败都不修改状态
        let mut staged: BTreeMap<DocPath, Option<DocumentData>> = BTreeMap::new();
        for write in &writes {
            let path = write.path();
            let effect = {
                let current = match staged.get(path) {
                    Some(pending) => pending.as_ref(),
                    None => state.docs.get(path).map(|d| &d.data),
                };
                apply_write(current, write, commit_time)?
            };
            match effect {
                WriteEffect::Put(data) => {
                    staged.insert(path.clone(), Some(data));
                }
                WriteEffect::Remove => {
                    staged.insert(path.clone(), None);
                }
                WriteEffect::Skip => {}
            }
        }

        state.sequence += 1;
        let version = state.sequence;
        for (path, data) in staged {
            match data {
                Some(data) => {
                    state.docs.insert(
                        path,
                        StoredDocument {
                            data,
                            version,
                            update_time: commit_time,
                        },
                    );
                }
                None => {
                    state.docs.remove(&path);
                }
            }
        }

        debug!("Memory store committed {} write(s) at version {}", writes.len(), version);
        Ok(CommitResult {
            version,
            commit_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FieldOp;
    use serde_json::json;

    fn subject_path() -> DocPath {
        DocPath::root("subjects", "s1").unwrap()
    }

    fn set(path: DocPath, value: serde_json::Value) -> Write {
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

    #[tokio::test]
    async fn test_apply_and_get() {
        let store = MemoryStore::new();
        store
            .apply(vec![set(subject_path(), json!({"name": "Math"}))])
            .await
            .unwrap();
        let doc = store.get(&subject_path()).await.unwrap().unwrap();
        assert_eq!(doc.get_str("name"), Some("Math"));
        assert_eq!(doc.version, 1);
    }

    #[tokio::test]
    async fn test_stale_document_read_conflicts() {
        let store = MemoryStore::new();
        store
            .apply(vec![set(subject_path(), json!({"name": "Math"}))])
            .await
            .unwrap();
        let snapshot = store
            .snapshot(&ReadSet::new().doc(subject_path()))
            .await
            .unwrap();
        store
            .apply(vec![set(subject_path(), json!({"name": "Physics"}))])
            .await
            .unwrap();

        let err = store
            .commit(&snapshot, vec![Write::Delete { path: subject_path() }])
            .await
            .unwrap_err();
        assert!(err.is_conflict());
        assert!(store.get(&subject_path()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_absent_read_conflicts_once_created() {
        let store = MemoryStore::new();
        let snapshot = store
            .snapshot(&ReadSet::new().doc(subject_path()))
            .await
            .unwrap();
        assert!(!snapshot.exists(&subject_path()).unwrap());
        store
            .apply(vec![set(subject_path(), json!({"name": "Math"}))])
            .await
            .unwrap();
        let err = store
            .commit(&snapshot, vec![set(subject_path(), json!({"name": "Art"}))])
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_collection_read_conflicts_on_new_child() {
        let store = MemoryStore::new();
        let teacher = DocPath::root("users", "t1").unwrap();
        let subjects = teacher.collection("subjects").unwrap();
        let snapshot = store
            .snapshot(&ReadSet::new().collection(subjects.clone()))
            .await
            .unwrap();
        assert!(snapshot.children(&subjects).unwrap().is_empty());

        store
            .apply(vec![set(subjects.doc("s1").unwrap(), json!({}))])
            .await
            .unwrap();
        let err = store
            .commit(&snapshot, vec![Write::Delete { path: teacher }])
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_store_untouched() {
        let store = MemoryStore::new();
        let missing = DocPath::root("sections", "nope").unwrap();
        let err = store
            .apply(vec![
                set(subject_path(), json!({"name": "Math"})),
                Write::Update {
                    path: missing,
                    fields: vec![("subjectIds".into(), FieldOp::array_union("s1"))],
                },
            ])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E004");
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_group_listing_spans_parents() {
        let store = MemoryStore::new();
        for section in ["sec1", "sec2"] {
            let path = DocPath::root("sections", section)
                .and_then(|p| p.child("sectionSubjects", "s1"))
                .unwrap();
            store.apply(vec![set(path, json!({}))]).await.unwrap();
        }
        assert_eq!(store.list_group("sectionSubjects").await.unwrap().len(), 2);
        assert!(store.list_group("subjects").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_undeclared_read_is_rejected() {
        let store = MemoryStore::new();
        let snapshot = store.snapshot(&ReadSet::new()).await.unwrap();
        assert_eq!(snapshot.get(&subject_path()).unwrap_err().code(), "E005");
    }
}
