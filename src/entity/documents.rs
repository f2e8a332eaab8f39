//! 文档实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub path: String,
    pub parent_path: String,
    pub collection_id: String,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub version: i64,
    pub update_time: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为存储层文档
impl Model {
    pub fn into_document(self) -> crate::errors::Result<crate::store::Document> {
        use crate::errors::SchoolRecordsError;
        use crate::store::{DocPath, DocumentData};
        use chrono::{DateTime, Utc};

        let path = DocPath::parse(&self.path)?;
        let data: DocumentData = serde_json::from_str(&self.data).map_err(|e| {
            SchoolRecordsError::serialization(format!("文档 {} 数据损坏: {e}", self.path))
        })?;

        Ok(crate::store::Document {
            path,
            data,
            version: self.version.max(0) as u64,
            update_time: DateTime::<Utc>::from_timestamp_micros(self.update_time)
                .unwrap_or_default(),
        })
    }
}
