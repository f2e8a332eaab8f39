use std::sync::Arc;

use tracing::debug;

use super::{USERS, decode_all, has_prefix, teacher_path};
use crate::errors::{Result, SchoolRecordsError};
use crate::models::teachers::entities::{Teacher, TeacherRole};
use crate::models::teachers::requests::{CreateTeacherRequest, UpdateTeacherRequest};
use crate::store::{CollectionPath, DocumentStore, FieldOp, Write};
use crate::utils::random_code::generate_document_id;
use crate::utils::validate::{require_id, validate_email};

/// 教师仓储（`users` 集合）
#[derive(Clone)]
pub struct TeacherRepository {
    store: Arc<dyn DocumentStore>,
}

impl TeacherRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, request: CreateTeacherRequest) -> Result<Teacher> {
        validate_email(&request.email).map_err(SchoolRecordsError::validation)?;
        let teacher = Teacher {
            id: generate_document_id(),
            verified: request.verified,
            last_name: request.last_name,
            first_name: request.first_name,
            email: request.email,
            username: request.username,
            role: request.role,
            middle_name: request.middle_name,
            contact_number: request.contact_number,
            age: request.age,
            gender: request.gender,
        };
        self.store
            .apply(vec![Write::set_model(teacher_path(&teacher.id)?, &teacher)?])
            .await?;
        debug!("Teacher {} created", teacher.id);
        Ok(teacher)
    }

    pub async fn update(&self, id: &str, request: &UpdateTeacherRequest) -> Result<Teacher> {
        let id = require_id("Teacher ID", id)?;
        if let Some(email) = &request.email {
            validate_email(email).map_err(SchoolRecordsError::validation)?;
        }
        self.store
            .apply(vec![Write::update_model(teacher_path(id)?, request)?])
            .await?;
        self.get(id).await
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<Teacher> {
        let id = require_id("Teacher ID", id)?;
        self.store
            .apply(vec![Write::Update {
                path: teacher_path(id)?,
                fields: vec![("verified".into(), FieldOp::value(verified))],
            }])
            .await?;
        self.get(id).await
    }

    pub async fn find(&self, id: &str) -> Result<Option<Teacher>> {
        let id = require_id("Teacher ID", id)?;
        match self.store.get(&teacher_path(id)?).await? {
            Some(doc) => Ok(Some(doc.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn get(&self, id: &str) -> Result<Teacher> {
        self.find(id)
            .await?
            .ok_or_else(|| SchoolRecordsError::not_found(format!("Teacher {id} not found")))
    }

    /// 全部教师，未审核的排在前面
    pub async fn list(&self) -> Result<Vec<Teacher>> {
        let mut teachers = self.all().await?;
        teachers.sort_by(|a, b| {
            a.verified
                .cmp(&b.verified)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        Ok(teachers)
    }

    pub async fn list_by_verified(&self, verified: bool) -> Result<Vec<Teacher>> {
        let mut teachers = self.all().await?;
        teachers.retain(|t| t.verified == verified);
        teachers.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(teachers)
    }

    /// 按姓氏前缀搜索
    pub async fn search_by_last_name(&self, prefix: &str) -> Result<Vec<Teacher>> {
        let mut teachers = self.all().await?;
        teachers.retain(|t| has_prefix(&t.last_name, prefix));
        teachers.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(teachers)
    }

    /// 非管理员教师数量
    pub async fn count_non_admin(&self) -> Result<usize> {
        Ok(self
            .all()
            .await?
            .iter()
            .filter(|t| t.role != TeacherRole::Admin)
            .count())
    }

    pub async fn count_by_verified(&self, verified: bool) -> Result<usize> {
        Ok(self
            .all()
            .await?
            .iter()
            .filter(|t| t.verified == verified)
            .count())
    }

    async fn all(&self) -> Result<Vec<Teacher>> {
        let docs = self.store.list(&CollectionPath::root(USERS)?).await?;
        decode_all(&docs)
    }
}
