//! 成绩册字段
//!
//! 教师-科目关联记录与成绩记录共用同一组 42 个数值字段：
//! 两个学期各 10 项书面作业（WW）、10 项表现任务（PT），以及两次考试。

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SchoolRecordsError};
use crate::store::{FieldOp, FieldWrites};

pub const GRADEBOOK_FIELD_COUNT: usize = 42;

/// 成绩册字段名（固定顺序）
pub static GRADEBOOK_FIELDS: Lazy<Vec<String>> = Lazy::new(|| {
    let mut fields = Vec::with_capacity(GRADEBOOK_FIELD_COUNT);
    for kind in ["WW", "PT"] {
        for term in ["First", "Second"] {
            for n in 1..=10 {
                fields.push(format!("{kind}{n}_{term}"));
            }
        }
    }
    fields.push("Exam_First".to_string());
    fields.push("Exam_Second".to_string());
    fields
});

pub fn is_gradebook_field(name: &str) -> bool {
    GRADEBOOK_FIELDS.iter().any(|field| field == name)
}

/// 成绩册字段值
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gradebook(BTreeMap<String, f64>);

impl Gradebook {
    /// 全部字段初始化为 0
    pub fn seeded() -> Self {
        Self(
            GRADEBOOK_FIELDS
                .iter()
                .map(|field| (field.clone(), 0.0))
                .collect(),
        )
    }

    pub fn get(&self, field: &str) -> Option<f64> {
        self.0.get(field).copied()
    }

    pub fn set(&mut self, field: &str, value: f64) -> Result<()> {
        check_field(field, value)?;
        self.0.insert(field.to_string(), value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 检查所有字段名与取值
    pub fn validate(&self) -> Result<()> {
        for (field, value) in &self.0 {
            check_field(field, *value)?;
        }
        Ok(())
    }

    /// 按固定字段顺序生成写入
    pub fn field_writes(&self) -> FieldWrites {
        GRADEBOOK_FIELDS
            .iter()
            .filter_map(|field| {
                self.0
                    .get(field)
                    .map(|value| (field.clone(), FieldOp::value(*value)))
            })
            .collect()
    }
}

impl From<BTreeMap<String, f64>> for Gradebook {
    fn from(fields: BTreeMap<String, f64>) -> Self {
        Self(fields)
    }
}

fn check_field(field: &str, value: f64) -> Result<()> {
    if !is_gradebook_field(field) {
        return Err(SchoolRecordsError::validation(format!(
            "'{field}' is not a gradebook field"
        )));
    }
    if !value.is_finite() {
        return Err(SchoolRecordsError::validation(format!(
            "{field} must be a finite number"
        )));
    }
    Ok(())
}
