//! 级联删除
//!
//! 删除教师、科目或班级时，在同一事务中删除其拥有的关联记录，
//! 并从对侧实体的反向索引数组中移除对应 ID。

mod delete_section;
mod delete_subject;
mod delete_teacher;

use std::sync::Arc;

use serde::Serialize;

use crate::errors::Result;
use crate::store::{DocumentStore, TransactionOptions};

/// 级联删除结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeSummary {
    /// 删除的关联记录数量
    pub joins_deleted: usize,
    /// 尝试更新的反向索引文档数量（不存在的文档被跳过）
    pub back_references_updated: usize,
}

#[derive(Clone)]
pub struct CascadeService {
    store: Arc<dyn DocumentStore>,
    options: TransactionOptions,
}

impl CascadeService {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }

    /// 删除教师及其全部教师-科目关联
    pub async fn delete_teacher(&self, teacher_id: &str) -> Result<CascadeSummary> {
        delete_teacher::delete_teacher(self, teacher_id).await
    }

    /// 删除科目及其在教师与班级下的全部关联
    pub async fn delete_subject(&self, subject_id: &str) -> Result<CascadeSummary> {
        delete_subject::delete_subject(self, subject_id).await
    }

    /// 删除班级及其全部班级-科目关联
    pub async fn delete_section(&self, section_id: &str) -> Result<CascadeSummary> {
        delete_section::delete_section(self, section_id).await
    }
}
