//! SeaORM 文档存储
//!
//! 每个文档存为 `documents` 表中的一行，支持 SQLite、PostgreSQL 和 MySQL。
//! 提交在数据库事务中先校验快照再写入；非 SQLite 数据库使用可串行化隔离级别。

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, DbBackend, EntityTrait, IsolationLevel, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::DocumentStore;
use super::document::{Document, DocumentData, Write, WriteEffect, apply_write};
use super::path::{CollectionPath, DocPath};
use super::transaction::{CommitResult, ReadSet, Snapshot, listing_fingerprint};
use crate::config::DatabaseConfig;
use crate::entity::documents::{ActiveModel, Column, Entity as Documents, Model};
use crate::errors::{Result, SchoolRecordsError};

/// 提交序号行的主键，不是合法的文档路径，不会出现在任何集合中
const SEQUENCE_ROW: &str = "__commit_sequence__";

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStore {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStore {
    /// 根据配置连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let store = Self::from_connection(db).await?;
        info!("SeaORM 文档存储初始化完成，数据库: {}", db_url);
        Ok(store)
    }

    /// 使用已有连接创建存储（会运行迁移）
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        // 内存数据库只能使用单连接，否则每个连接各自一份数据
        let max_connections = if url.contains(":memory:") {
            1
        } else {
            config.pool_size.max(1)
        };
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolRecordsError::database_connection(format!("SQLite 连接失败: {e}")))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolRecordsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolRecordsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    async fn begin(&self) -> Result<DatabaseTransaction> {
        let txn = if self.db.get_database_backend() == DbBackend::Sqlite {
            self.db.begin().await
        } else {
            self.db
                .begin_with_config(Some(IsolationLevel::Serializable), None)
                .await
        };
        txn.map_err(|e| SchoolRecordsError::database_operation(format!("开启事务失败: {e}")))
    }

    async fn fetch_one<C: ConnectionTrait>(conn: &C, path: &DocPath) -> Result<Option<Document>> {
        Documents::find_by_id(path.to_string())
            .one(conn)
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("查询文档失败: {e}")))?
            .map(Model::into_document)
            .transpose()
    }

    async fn fetch_children<C: ConnectionTrait>(
        conn: &C,
        collection: &CollectionPath,
    ) -> Result<Vec<Document>> {
        Documents::find()
            .filter(Column::ParentPath.eq(collection.to_string()))
            .order_by_asc(Column::Path)
            .all(conn)
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("查询集合失败: {e}")))?
            .into_iter()
            .map(Model::into_document)
            .collect()
    }

    async fn fetch_group<C: ConnectionTrait>(
        conn: &C,
        collection_id: &str,
    ) -> Result<Vec<Document>> {
        Documents::find()
            .filter(Column::CollectionId.eq(collection_id))
            .order_by_asc(Column::Path)
            .all(conn)
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("查询集合组失败: {e}")))?
            .into_iter()
            .map(Model::into_document)
            .collect()
    }

    async fn validate(txn: &DatabaseTransaction, snapshot: &Snapshot) -> Result<()> {
        for (path, version) in snapshot.doc_reads() {
            let current = Self::fetch_one(txn, path).await?.map(|d| d.version);
            if current != version {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "{path} changed since it was read"
                )));
            }
        }
        for (path, docs) in snapshot.collection_reads() {
            let current = Self::fetch_children(txn, path).await?;
            if listing_fingerprint(&current) != listing_fingerprint(docs) {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "collection {path} changed since it was read"
                )));
            }
        }
        for (collection_id, docs) in snapshot.group_reads() {
            let current = Self::fetch_group(txn, collection_id).await?;
            if listing_fingerprint(&current) != listing_fingerprint(docs) {
                return Err(SchoolRecordsError::store_transaction_conflict(format!(
                    "collection group {collection_id} changed since it was read"
                )));
            }
        }
        Ok(())
    }

    /// 分配提交序号并持久化到序号行
    ///
    /// 序号全局单调递增，删除后重建的文档也不会拿回旧版本号。
    async fn next_version(
        txn: &DatabaseTransaction,
        commit_time: DateTime<Utc>,
        overwritten: u64,
    ) -> Result<u64> {
        let previous = Documents::find_by_id(SEQUENCE_ROW.to_string())
            .one(txn)
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("读取提交序号失败: {e}")))?;
        let last = previous.as_ref().map_or(0, |row| row.version.max(0) as u64);
        let version = (commit_time.timestamp_micros().max(0) as u64)
            .max(last + 1)
            .max(overwritten + 1);

        let row = ActiveModel {
            path: Set(SEQUENCE_ROW.to_string()),
            parent_path: Set(String::new()),
            collection_id: Set(String::new()),
            data: Set("{}".to_string()),
            version: Set(version as i64),
            update_time: Set(commit_time.timestamp_micros()),
        };
        if previous.is_some() {
            row.update(txn).await
        } else {
            row.insert(txn).await
        }
        .map_err(|e| SchoolRecordsError::database_operation(format!("写入提交序号失败: {e}")))?;
        Ok(version)
    }

    async fn commit_in(
        txn: &DatabaseTransaction,
        snapshot: &Snapshot,
        writes: &[Write],
    ) -> Result<CommitResult> {
        Self::validate(txn, snapshot).await?;

        let commit_time = Utc::now();
        let mut existing: HashSet<DocPath> = HashSet::new();
        let mut max_version: u64 = 0;
        let mut staged: BTreeMap<DocPath, Option<DocumentData>> = BTreeMap::new();

        for write in writes {
            let path = write.path();
            if !staged.contains_key(path)
                && let Some(current) = Self::fetch_one(txn, path).await?
            {
                existing.insert(path.clone());
                max_version = max_version.max(current.version);
                staged.insert(path.clone(), Some(current.data));
            }
            let effect = {
                let current = staged.get(path).and_then(Option::as_ref);
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

        let version = Self::next_version(txn, commit_time, max_version).await?;
        for (path, data) in staged {
            match data {
                Some(data) => {
                    let model = ActiveModel {
                        path: Set(path.to_string()),
                        parent_path: Set(path.parent().to_string()),
                        collection_id: Set(path.collection_id().to_string()),
                        data: Set(serde_json::to_string(&data)?),
                        version: Set(version as i64),
                        update_time: Set(commit_time.timestamp_micros()),
                    };
                    if existing.contains(&path) {
                        model.update(txn).await
                    } else {
                        model.insert(txn).await
                    }
                    .map_err(|e| {
                        SchoolRecordsError::database_operation(format!("写入文档失败: {e}"))
                    })?;
                }
                None => {
                    if existing.contains(&path) {
                        Documents::delete_by_id(path.to_string())
                            .exec(txn)
                            .await
                            .map_err(|e| {
                                SchoolRecordsError::database_operation(format!(
                                    "删除文档失败: {e}"
                                ))
                            })?;
                    }
                }
            }
        }

        Ok(CommitResult {
            version,
            commit_time,
        })
    }
}

/// 数据库层的并发冲突同样按事务冲突处理
fn classify_db_error(err: SchoolRecordsError) -> SchoolRecordsError {
    let message = err.message().to_ascii_lowercase();
    if message.contains("database is locked")
        || message.contains("busy")
        || message.contains("could not serialize")
        || message.contains("deadlock")
    {
        SchoolRecordsError::store_transaction_conflict(err.message())
    } else {
        err
    }
}

#[async_trait]
impl DocumentStore for SeaOrmStore {
    fn backend_name(&self) -> &'static str {
        "sea_orm"
    }

    async fn get(&self, path: &DocPath) -> Result<Option<Document>> {
        Self::fetch_one(&self.db, path).await
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        Self::fetch_children(&self.db, collection).await
    }

    async fn list_group(&self, collection_id: &str) -> Result<Vec<Document>> {
        Self::fetch_group(&self.db, collection_id).await
    }

    async fn snapshot(&self, reads: &ReadSet) -> Result<Snapshot> {
        let txn = self.begin().await?;
        let mut snapshot = Snapshot::default();
        for path in &reads.docs {
            snapshot.record_doc(path.clone(), Self::fetch_one(&txn, path).await?);
        }
        for path in &reads.collections {
            snapshot.record_collection(path.clone(), Self::fetch_children(&txn, path).await?);
        }
        for collection_id in &reads.groups {
            snapshot.record_group(
                collection_id.clone(),
                Self::fetch_group(&txn, collection_id).await?,
            );
        }
        txn.commit()
            .await
            .map_err(|e| SchoolRecordsError::database_operation(format!("读取快照失败: {e}")))?;
        Ok(snapshot)
    }

    async fn commit(&self, snapshot: &Snapshot, writes: Vec<Write>) -> Result<CommitResult> {
        let txn = self.begin().await.map_err(classify_db_error)?;
        match Self::commit_in(&txn, snapshot, &writes).await {
            Ok(result) => {
                txn.commit().await.map_err(|e| {
                    classify_db_error(SchoolRecordsError::database_operation(format!(
                        "提交事务失败: {e}"
                    )))
                })?;
                debug!(
                    "SeaORM store committed {} write(s) at version {}",
                    writes.len(),
                    result.version
                );
                Ok(result)
            }
            Err(e) => {
                txn.rollback().await.map_err(|rollback| {
                    SchoolRecordsError::database_operation(format!("回滚事务失败: {rollback}"))
                })?;
                Err(classify_db_error(e))
            }
        }
    }
}
