//! 文档存储层
//!
//! 提供带乐观并发控制的文档数据库抽象，支持内存与 SeaORM 两种后端。

pub mod document;
pub mod memory;
pub mod path;
pub mod register;
pub mod sea_orm_store;
pub mod transaction;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{DatabaseConfig, StoreConfig};
use crate::errors::{Result, SchoolRecordsError};

pub use document::{Document, DocumentData, FieldOp, FieldWrites, Write};
pub use path::{CollectionPath, DocPath};
pub use transaction::{
    CommitResult, Committed, ReadSet, Snapshot, Transaction, TransactionOptions, run_transaction,
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// 后端名称
    fn backend_name(&self) -> &'static str;
    // 读取单个文档
    async fn get(&self, path: &DocPath) -> Result<Option<Document>>;
    // 列出集合下的全部文档
    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>>;
    // 列出所有同名集合中的文档
    async fn list_group(&self, collection_id: &str) -> Result<Vec<Document>>;
    // 原子地读取整个读集合
    async fn snapshot(&self, reads: &ReadSet) -> Result<Snapshot>;
    // 校验快照未过期并原子地应用写入，否则返回 StoreTransactionConflict
    async fn commit(&self, snapshot: &Snapshot, writes: Vec<Write>) -> Result<CommitResult>;

    /// 非事务写入（空读集合的提交）
    async fn apply(&self, writes: Vec<Write>) -> Result<CommitResult> {
        self.commit(&Snapshot::default(), writes).await
    }
}

/// 根据配置创建存储后端
pub async fn create_store(
    store: &StoreConfig,
    database: &DatabaseConfig,
) -> Result<Arc<dyn DocumentStore>> {
    let constructor = register::get_store_plugin(&store.backend).ok_or_else(|| {
        SchoolRecordsError::storage_plugin_not_found(format!(
            "Store backend '{}' is not registered",
            store.backend
        ))
    })?;
    constructor(database.clone()).await
}
