use std::sync::Arc;

use tracing::debug;

use super::{SUBJECTS, decode_all, subject_path};
use crate::errors::{Result, SchoolRecordsError};
use crate::models::subjects::entities::Subject;
use crate::models::subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest};
use crate::store::{CollectionPath, DocumentStore, Write};
use crate::utils::random_code::generate_document_id;
use crate::utils::validate::require_id;

/// 科目仓储
///
/// `teacherIds` 只由分配引擎维护，更新请求无法修改它。
#[derive(Clone)]
pub struct SubjectRepository {
    store: Arc<dyn DocumentStore>,
}

impl SubjectRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, request: CreateSubjectRequest) -> Result<Subject> {
        let subject = Subject {
            id: generate_document_id(),
            name: request.name,
            track: request.track,
            semester: request.semester,
            teacher_ids: Vec::new(),
        };
        self.store
            .apply(vec![Write::set_model(subject_path(&subject.id)?, &subject)?])
            .await?;
        debug!("Subject {} created", subject.id);
        Ok(subject)
    }

    pub async fn update(&self, id: &str, request: &UpdateSubjectRequest) -> Result<Subject> {
        let id = require_id("Subject ID", id)?;
        self.store
            .apply(vec![Write::update_model(subject_path(id)?, request)?])
            .await?;
        self.get(id).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Subject>> {
        let id = require_id("Subject ID", id)?;
        match self.store.get(&subject_path(id)?).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Subject> {
        self.find(id)
            .await?
            .ok_or_else(|| SchoolRecordsError::not_found(format!("Subject {id} not found")))
    }

    pub async fn list(&self) -> Result<Vec<Subject>> {
        let docs = self.store.list(&CollectionPath::root(SUBJECTS)?).await?;
        let mut subjects: Vec<Subject> = decode_all(&docs)?;
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    pub async fn count(&self) -> Result<usize> {
        Ok(self.store.list(&CollectionPath::root(SUBJECTS)?).await?.len())
    }
}
