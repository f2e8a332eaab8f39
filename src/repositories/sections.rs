use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::{SECTIONS, decode_all, section_path};
use crate::errors::{Result, SchoolRecordsError};
use crate::models::sections::entities::Section;
use crate::models::sections::requests::{CreateSectionRequest, UpdateSectionRequest};
use crate::store::{CollectionPath, DocumentStore, FieldOp, Write};
use crate::utils::random_code::generate_document_id;
use crate::utils::validate::require_id;

/// 班级仓储
#[derive(Clone)]
pub struct SectionRepository {
    store: Arc<dyn DocumentStore>,
}

impl SectionRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, request: CreateSectionRequest) -> Result<Section> {
        let section = Section {
            id: generate_document_id(),
            name: request.name,
            strand: request.strand,
            year_level: request.year_level,
            subject_ids: Vec::new(),
            adviser_id: request.adviser_id,
        };
        self.store
            .apply(vec![Write::set_model(section_path(&section.id)?, &section)?])
            .await?;
        debug!("Section {} created", section.id);
        Ok(section)
    }

    pub async fn update(&self, id: &str, request: &UpdateSectionRequest) -> Result<Section> {
        let id = require_id("Section ID", id)?;
        self.store
            .apply(vec![Write::update_model(section_path(id)?, request)?])
            .await?;
        self.get(id).await
    }

    pub async fn set_adviser(&self, id: &str, teacher_id: &str) -> Result<Section> {
        let teacher_id = require_id("Teacher ID", teacher_id)?;
        self.write_adviser(id, FieldOp::value(teacher_id)).await
    }

    /// 移除班主任（adviserId 置为 null）
    pub async fn remove_adviser(&self, id: &str) -> Result<Section> {
        self.write_adviser(id, FieldOp::Value(Value::Null)).await
    }

    async fn write_adviser(&self, id: &str, op: FieldOp) -> Result<Section> {
        let id = require_id("Section ID", id)?;
        self.store
            .apply(vec![Write::Update {
                path: section_path(id)?,
                fields: vec![("adviserId".into(), op)],
            }])
            .await?;
        self.get(id).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Section>> {
        let id = require_id("Section ID", id)?;
        match self.store.get(&section_path(id)?).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Section> {
        self.find(id)
            .await?
            .ok_or_else(|| SchoolRecordsError::not_found(format!("Section {id} not found")))
    }

    pub async fn list(&self) -> Result<Vec<Section>> {
        let mut sections = self.all().await?;
        sections.sort_by(|a, b| {
            a.year_level
                .cmp(&b.year_level)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(sections)
    }

    pub async fn list_by_adviser(&self, teacher_id: &str) -> Result<Vec<Section>> {
        let mut sections = self.list().await?;
        sections.retain(|s| s.adviser_id.as_deref() == Some(teacher_id));
        Ok(sections)
    }

    pub async fn list_by_year_level(&self, year_level: u32) -> Result<Vec<Section>> {
        let mut sections = self.list().await?;
        sections.retain(|s| s.year_level == year_level);
        Ok(sections)
    }

    /// 班级数量，可按年级过滤
    pub async fn count(&self, year_level: Option<u32>) -> Result<usize> {
        let sections = self.all().await?;
        Ok(match year_level {
            Some(level) => sections.iter().filter(|s| s.year_level == level).count(),
            None => sections.len(),
        })
    }

    async fn all(&self) -> Result<Vec<Section>> {
        let docs = self.store.list(&CollectionPath::root(SECTIONS)?).await?;
        decode_all(&docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn request(name: &str, year_level: u32) -> CreateSectionRequest {
        CreateSectionRequest {
            name: name.to_string(),
            strand: "STEM".to_string(),
            year_level,
            adviser_id: None,
        }
    }

    #[tokio::test]
    async fn test_adviser_set_and_removed() {
        let repo = SectionRepository::new(Arc::new(MemoryStore::new()));
        let section = repo.add(request("Grade 10 - A", 10)).await.unwrap();
        assert!(section.subject_ids.is_empty());

        let section = repo.set_adviser(&section.id, "t1").await.unwrap();
        assert_eq!(section.adviser_id.as_deref(), Some("t1"));
        assert_eq!(repo.list_by_adviser("t1").await.unwrap().len(), 1);

        let section = repo.remove_adviser(&section.id).await.unwrap();
        assert_eq!(section.adviser_id, None);
        let doc = repo
            .store
            .get(&section_path(&section.id).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.data.get("adviserId"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_year_level_filters() {
        let repo = SectionRepository::new(Arc::new(MemoryStore::new()));
        repo.add(request("Grade 11 - B", 11)).await.unwrap();
        repo.add(request("Grade 11 - A", 11)).await.unwrap();
        repo.add(request("Grade 12 - A", 12)).await.unwrap();

        let grade_11 = repo.list_by_year_level(11).await.unwrap();
        assert_eq!(grade_11.len(), 2);
        assert_eq!(grade_11[0].name, "Grade 11 - A");
        assert_eq!(repo.count(Some(12)).await.unwrap(), 1);
        assert_eq!(repo.count(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_set_adviser_on_missing_section() {
        let repo = SectionRepository::new(Arc::new(MemoryStore::new()));
        let err = repo.set_adviser("ghost", "t1").await.unwrap_err();
        assert_eq!(err.code(), "E004");
    }
}
