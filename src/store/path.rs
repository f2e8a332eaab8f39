//! 文档与集合路径
//!
//! 文档路径由偶数个段组成（`sections/sec1/sectionSubjects/s1`），
//! 集合路径由奇数个段组成（`sections/sec1/sectionSubjects`）。

use std::fmt;

use crate::errors::{Result, SchoolRecordsError};
use crate::utils::validate::validate_document_id;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocPath {
    segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    /// 顶层集合
    pub fn root(collection_id: &str) -> Result<Self> {
        validate_document_id("collection", collection_id)?;
        Ok(Self {
            segments: vec![collection_id.to_string()],
        })
    }

    /// 集合中的文档
    pub fn doc(&self, id: &str) -> Result<DocPath> {
        validate_document_id("id", id)?;
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Ok(DocPath { segments })
    }

    /// 集合 ID（最后一段）
    pub fn collection_id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// 所属父文档，顶层集合返回 None
    pub fn parent(&self) -> Option<DocPath> {
        if self.segments.len() < 3 {
            return None;
        }
        Some(DocPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let segments = split_segments(raw)?;
        if segments.len() % 2 == 0 {
            return Err(SchoolRecordsError::validation(format!(
                "'{raw}' is not a collection path"
            )));
        }
        Ok(Self { segments })
    }
}

impl DocPath {
    /// 顶层集合中的文档
    pub fn root(collection_id: &str, id: &str) -> Result<Self> {
        CollectionPath::root(collection_id)?.doc(id)
    }

    /// 子集合中的文档
    pub fn child(&self, collection_id: &str, id: &str) -> Result<Self> {
        self.collection(collection_id)?.doc(id)
    }

    /// 子集合
    pub fn collection(&self, collection_id: &str) -> Result<CollectionPath> {
        validate_document_id("collection", collection_id)?;
        let mut segments = self.segments.clone();
        segments.push(collection_id.to_string());
        Ok(CollectionPath { segments })
    }

    pub fn id(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn collection_id(&self) -> &str {
        &self.segments[self.segments.len() - 2]
    }

    /// 文档所在集合
    pub fn parent(&self) -> CollectionPath {
        CollectionPath {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let segments = split_segments(raw)?;
        if segments.len() % 2 != 0 {
            return Err(SchoolRecordsError::validation(format!(
                "'{raw}' is not a document path"
            )));
        }
        Ok(Self { segments })
    }
}

fn split_segments(raw: &str) -> Result<Vec<String>> {
    let segments: Vec<String> = raw.split('/').map(str::to_string).collect();
    for segment in &segments {
        validate_document_id("path segment", segment)?;
    }
    Ok(segments)
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
