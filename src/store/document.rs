//! 文档、字段操作与写入描述
//!
//! 写入在提交时才被应用，`ServerTimestamp` 统一解析为本次提交的时间。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::path::DocPath;
use crate::errors::{Result, SchoolRecordsError};

pub type DocumentData = serde_json::Map<String, Value>;

/// 已存储的文档
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocPath,
    pub data: DocumentData,
    /// 最后一次写入该文档的提交序号
    pub version: u64,
    pub update_time: DateTime<Utc>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.path.id()
    }

    /// 反序列化为业务模型，数据中缺少 `id` 时使用路径中的 ID
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let mut data = self.data.clone();
        data.entry("id")
            .or_insert_with(|| Value::String(self.id().to_string()));
        serde_json::from_value(Value::Object(data)).map_err(|e| {
            SchoolRecordsError::serialization(format!("文档 {} 解析失败: {e}", self.path))
        })
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.data.get(field).and_then(Value::as_str)
    }

    /// 读取字符串数组字段，缺失或类型不符时视为空
    pub fn string_array(&self, field: &str) -> Vec<String> {
        self.data
            .get(field)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// 单个字段上的写操作
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOp {
    Value(Value),
    /// 集合并：仅追加尚不存在的元素
    ArrayUnion(Vec<Value>),
    /// 集合差：删除所有相等元素
    ArrayRemove(Vec<Value>),
    ServerTimestamp,
    Delete,
}

impl FieldOp {
    pub fn value(value: impl Into<Value>) -> Self {
        FieldOp::Value(value.into())
    }

    pub fn array_union(value: impl Into<Value>) -> Self {
        FieldOp::ArrayUnion(vec![value.into()])
    }

    pub fn array_remove(value: impl Into<Value>) -> Self {
        FieldOp::ArrayRemove(vec![value.into()])
    }
}

pub type FieldWrites = Vec<(String, FieldOp)>;

/// 待提交的写入
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    /// 整体覆盖
    Set { path: DocPath, fields: FieldWrites },
    /// 合并更新，文档必须存在
    Update { path: DocPath, fields: FieldWrites },
    /// 合并更新，文档不存在时跳过
    UpdateIfExists { path: DocPath, fields: FieldWrites },
    /// 删除，文档不存在时不报错
    Delete { path: DocPath },
}

impl Write {
    pub fn path(&self) -> &DocPath {
        match self {
            Write::Set { path, .. }
            | Write::Update { path, .. }
            | Write::UpdateIfExists { path, .. }
            | Write::Delete { path } => path,
        }
    }

    /// 用模型整体覆盖文档
    pub fn set_model<T: Serialize>(path: DocPath, model: &T) -> Result<Self> {
        Ok(Write::Set {
            path,
            fields: into_field_writes(encode_model(model)?),
        })
    }

    /// 用模型合并更新文档（文档必须存在）
    pub fn update_model<T: Serialize>(path: DocPath, model: &T) -> Result<Self> {
        Ok(Write::Update {
            path,
            fields: into_field_writes(encode_model(model)?),
        })
    }
}

/// 序列化模型为文档数据，要求结果为 JSON 对象
pub fn encode_model<T: Serialize>(model: &T) -> Result<DocumentData> {
    match serde_json::to_value(model)? {
        Value::Object(map) => Ok(map),
        other => Err(SchoolRecordsError::serialization(format!(
            "document must serialize to an object, got {other}"
        ))),
    }
}

pub fn into_field_writes(data: DocumentData) -> FieldWrites {
    data.into_iter()
        .map(|(k, v)| (k, FieldOp::Value(v)))
        .collect()
}

/// 写入对单个文档的效果
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum WriteEffect {
    Put(DocumentData),
    Remove,
    Skip,
}

/// 在当前文档状态上应用写入
pub(crate) fn apply_write(
    current: Option<&DocumentData>,
    write: &Write,
    commit_time: DateTime<Utc>,
) -> Result<WriteEffect> {
    match write {
        Write::Set { fields, .. } => {
            let mut data = DocumentData::new();
            apply_fields(&mut data, fields, commit_time);
            Ok(WriteEffect::Put(data))
        }
        Write::Update { path, fields } => match current {
            Some(existing) => {
                let mut data = existing.clone();
                apply_fields(&mut data, fields, commit_time);
                Ok(WriteEffect::Put(data))
            }
            None => Err(SchoolRecordsError::not_found(format!(
                "No document to update: {path}"
            ))),
        },
        Write::UpdateIfExists { fields, .. } => match current {
            Some(existing) => {
                let mut data = existing.clone();
                apply_fields(&mut data, fields, commit_time);
                Ok(WriteEffect::Put(data))
            }
            None => Ok(WriteEffect::Skip),
        },
        Write::Delete { .. } => Ok(WriteEffect::Remove),
    }
}

fn apply_fields(data: &mut DocumentData, fields: &FieldWrites, commit_time: DateTime<Utc>) {
    for (name, op) in fields {
        match op {
            FieldOp::Value(value) => {
                data.insert(name.clone(), value.clone());
            }
            FieldOp::ArrayUnion(values) => {
                let mut items = current_array(data, name);
                for value in values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                data.insert(name.clone(), Value::Array(items));
            }
            FieldOp::ArrayRemove(values) => {
                let mut items = current_array(data, name);
                items.retain(|item| !values.contains(item));
                data.insert(name.clone(), Value::Array(items));
            }
            FieldOp::ServerTimestamp => {
                data.insert(
                    name.clone(),
                    Value::String(commit_time.to_rfc3339_opts(SecondsFormat::Micros, true)),
                );
            }
            FieldOp::Delete => {
                data.remove(name);
            }
        }
    }
}

fn current_array(data: &DocumentData, name: &str) -> Vec<Value> {
    data.get(name)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> DocPath {
        DocPath::root("subjects", "s1").unwrap()
    }

    fn data(value: Value) -> DocumentData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_array_union_is_idempotent_and_ordered() {
        let current = data(json!({"teacherIds": ["t1"]}));
        let write = Write::Update {
            path: path(),
            fields: vec![
                ("teacherIds".into(), FieldOp::array_union("t2")),
                ("teacherIds".into(), FieldOp::array_union("t1")),
            ],
        };
        let effect = apply_write(Some(&current), &write, Utc::now()).unwrap();
        assert_eq!(
            effect,
            WriteEffect::Put(data(json!({"teacherIds": ["t1", "t2"]})))
        );
    }

    #[test]
    fn test_array_remove_on_missing_field_yields_empty() {
        let current = data(json!({"name": "Math"}));
        let write = Write::Update {
            path: path(),
            fields: vec![("teacherIds".into(), FieldOp::array_remove("t1"))],
        };
        let effect = apply_write(Some(&current), &write, Utc::now()).unwrap();
        assert_eq!(
            effect,
            WriteEffect::Put(data(json!({"name": "Math", "teacherIds": []})))
        );
    }

    #[test]
    fn test_update_requires_existing_document() {
        let write = Write::Update {
            path: path(),
            fields: vec![("name".into(), FieldOp::value("Math"))],
        };
        let err = apply_write(None, &write, Utc::now()).unwrap_err();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_update_if_exists_skips_missing_document() {
        let write = Write::UpdateIfExists {
            path: path(),
            fields: vec![("teacherIds".into(), FieldOp::array_remove("t1"))],
        };
        assert_eq!(
            apply_write(None, &write, Utc::now()).unwrap(),
            WriteEffect::Skip
        );
    }

    #[test]
    fn test_server_timestamp_uses_commit_time() {
        let commit_time = Utc::now();
        let write = Write::Set {
            path: path(),
            fields: vec![("assignedAt".into(), FieldOp::ServerTimestamp)],
        };
        let WriteEffect::Put(result) = apply_write(None, &write, commit_time).unwrap() else {
            panic!("set must produce a document");
        };
        let stored: DateTime<Utc> =
            serde_json::from_value(result["assignedAt"].clone()).unwrap();
        assert_eq!(stored.timestamp_micros(), commit_time.timestamp_micros());
    }

    #[test]
    fn test_decode_injects_path_id() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            name: String,
        }
        let doc = Document {
            path: path(),
            data: data(json!({"name": "Math"})),
            version: 1,
            update_time: Utc::now(),
        };
        let named: Named = doc.decode().unwrap();
        assert_eq!(named.id, "s1");
        assert_eq!(named.name, "Math");
    }
}
