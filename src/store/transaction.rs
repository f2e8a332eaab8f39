//! 乐观事务
//!
//! 事务由三部分组成：预先声明的读集合（`ReadSet`）、在快照上运行的纯函数
//! （只暂存写入，不产生外部副作用），以及存储层的原子提交。提交时若任何
//! 已读文档或集合发生变化，存储返回冲突，`run_transaction` 从新快照重新执行。

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use super::DocumentStore;
use super::document::{Document, FieldWrites, Write};
use super::path::{CollectionPath, DocPath};
use crate::errors::{Result, SchoolRecordsError};

/// 事务重试参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransactionOptions {
    /// 最大执行次数（含首次）
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for TransactionOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_backoff_ms: 20,
        }
    }
}

/// 事务读集合
#[derive(Debug, Clone, Default)]
pub struct ReadSet {
    pub(crate) docs: Vec<DocPath>,
    pub(crate) collections: Vec<CollectionPath>,
    pub(crate) groups: Vec<String>,
}

impl ReadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(mut self, path: DocPath) -> Self {
        self.docs.push(path);
        self
    }

    /// 读取集合下的全部文档
    pub fn collection(mut self, path: CollectionPath) -> Self {
        self.collections.push(path);
        self
    }

    /// 读取任意位置上同名集合的全部文档
    pub fn group(mut self, collection_id: impl Into<String>) -> Self {
        self.groups.push(collection_id.into());
        self
    }
}

/// 读集合在某一时刻的一致快照
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    docs: BTreeMap<DocPath, Option<Document>>,
    collections: BTreeMap<CollectionPath, Vec<Document>>,
    groups: BTreeMap<String, Vec<Document>>,
}

impl Snapshot {
    pub(crate) fn record_doc(&mut self, path: DocPath, doc: Option<Document>) {
        self.docs.insert(path, doc);
    }

    pub(crate) fn record_collection(&mut self, path: CollectionPath, docs: Vec<Document>) {
        self.collections.insert(path, docs);
    }

    pub(crate) fn record_group(&mut self, collection_id: String, docs: Vec<Document>) {
        self.groups.insert(collection_id, docs);
    }

    pub fn get(&self, path: &DocPath) -> Result<Option<&Document>> {
        self.docs.get(path).map(Option::as_ref).ok_or_else(|| {
            SchoolRecordsError::validation(format!("{path} was not declared in the read set"))
        })
    }

    pub fn exists(&self, path: &DocPath) -> Result<bool> {
        Ok(self.get(path)?.is_some())
    }

    pub fn children(&self, path: &CollectionPath) -> Result<&[Document]> {
        self.collections.get(path).map(Vec::as_slice).ok_or_else(|| {
            SchoolRecordsError::validation(format!("{path} was not declared in the read set"))
        })
    }

    pub fn group(&self, collection_id: &str) -> Result<&[Document]> {
        self.groups.get(collection_id).map(Vec::as_slice).ok_or_else(|| {
            SchoolRecordsError::validation(format!(
                "collection group {collection_id} was not declared in the read set"
            ))
        })
    }

    pub(crate) fn doc_reads(&self) -> impl Iterator<Item = (&DocPath, Option<u64>)> {
        self.docs
            .iter()
            .map(|(path, doc)| (path, doc.as_ref().map(|d| d.version)))
    }

    pub(crate) fn collection_reads(&self) -> impl Iterator<Item = (&CollectionPath, &[Document])> {
        self.collections
            .iter()
            .map(|(path, docs)| (path, docs.as_slice()))
    }

    pub(crate) fn group_reads(&self) -> impl Iterator<Item = (&str, &[Document])> {
        self.groups
            .iter()
            .map(|(id, docs)| (id.as_str(), docs.as_slice()))
    }
}

/// 集合读取的指纹：按路径排序的 (路径, 版本)
pub(crate) fn listing_fingerprint(docs: &[Document]) -> Vec<(DocPath, u64)> {
    let mut fingerprint: Vec<(DocPath, u64)> = docs
        .iter()
        .map(|doc| (doc.path.clone(), doc.version))
        .collect();
    fingerprint.sort();
    fingerprint
}

/// 暂存的写入
#[derive(Debug, Default)]
pub struct Transaction {
    writes: Vec<Write>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, path: DocPath, fields: FieldWrites) -> &mut Self {
        self.writes.push(Write::Set { path, fields });
        self
    }

    pub fn set_model<T: Serialize>(&mut self, path: DocPath, model: &T) -> Result<&mut Self> {
        self.writes.push(Write::set_model(path, model)?);
        Ok(self)
    }

    pub fn update(&mut self, path: DocPath, fields: FieldWrites) -> &mut Self {
        self.writes.push(Write::Update { path, fields });
        self
    }

    pub fn update_if_exists(&mut self, path: DocPath, fields: FieldWrites) -> &mut Self {
        self.writes.push(Write::UpdateIfExists { path, fields });
        self
    }

    pub fn delete(&mut self, path: DocPath) -> &mut Self {
        self.writes.push(Write::Delete { path });
        self
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn into_writes(self) -> Vec<Write> {
        self.writes
    }
}

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub struct CommitResult {
    /// 本次提交分配的序号，写入的文档以此为新版本
    pub version: u64,
    pub commit_time: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Committed<T> {
    pub value: T,
    pub commit: CommitResult,
}

/// 执行一个可重试的事务
///
/// `plan` 只能通过快照读取数据、通过 `Transaction` 暂存写入；它返回错误时
/// 事务中止，不写入任何内容。冲突时最多执行 `max_attempts` 次。
pub async fn run_transaction<T, F>(
    store: &dyn DocumentStore,
    options: &TransactionOptions,
    reads: &ReadSet,
    mut plan: F,
) -> Result<Committed<T>>
where
    F: FnMut(&Snapshot, &mut Transaction) -> Result<T> + Send,
    T: Send,
{
    let max_attempts = options.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let snapshot = store.snapshot(reads).await?;
        let mut tx = Transaction::new();
        let value = plan(&snapshot, &mut tx)?;

        match store.commit(&snapshot, tx.into_writes()).await {
            Ok(commit) => return Ok(Committed { value, commit }),
            Err(e) if e.is_conflict() && attempt < max_attempts => {
                debug!(
                    "Transaction conflict on attempt {}/{}: {}",
                    attempt,
                    max_attempts,
                    e.message()
                );
                let backoff = options.retry_backoff_ms.saturating_mul(u64::from(attempt));
                if backoff > 0 {
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                }
            }
            Err(e) if e.is_conflict() => {
                warn!("Transaction gave up after {} attempts", attempt);
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "transaction still conflicting after {attempt} attempts: {}",
                    e.message()
                )));
            }
            Err(e) => return Err(e),
        }
    }
}
