use std::sync::Arc;

use super::{STUDENTS, decode_all, has_prefix};
use crate::errors::{Result, SchoolRecordsError};
use crate::models::students::entities::Student;
use crate::models::students::requests::{CreateStudentRequest, UpdateStudentRequest};
use crate::store::{CollectionPath, DocPath, DocumentStore, Write};
use crate::utils::random_code::generate_document_id;
use crate::utils::validate::require_id;

fn student_path(id: &str) -> Result<DocPath> {
    DocPath::root(STUDENTS, id)
}

/// 学生仓储
#[derive(Clone)]
pub struct StudentRepository {
    store: Arc<dyn DocumentStore>,
}

impl StudentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn add(&self, request: CreateStudentRequest) -> Result<Student> {
        let student = Student {
            id: generate_document_id(),
            last_name: request.last_name,
            first_name: request.first_name,
            middle_name: request.middle_name,
            gender: request.gender,
            age: request.age,
            birth_date: request.birth_date,
            address: request.address,
            section_id: request.section_id,
            extra_fields: request.extra_fields,
        };
        self.store
            .apply(vec![Write::set_model(student_path(&student.id)?, &student)?])
            .await?;
        Ok(student)
    }

    pub async fn update(&self, id: &str, request: &UpdateStudentRequest) -> Result<Student> {
        let id = require_id("Student ID", id)?;
        self.store
            .apply(vec![Write::update_model(student_path(id)?, request)?])
            .await?;
        self.get(id).await
    }

    /// 删除学生，不存在时不报错
    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = require_id("Student ID", id)?;
        self.store
            .apply(vec![Write::Delete {
                path: student_path(id)?,
            }])
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> Result<Student> {
        let id = require_id("Student ID", id)?;
        match self.store.get(&student_path(id)?).await? {
            Some(doc) => doc.decode(),
            None => Err(SchoolRecordsError::not_found(format!(
                "Student {id} not found"
            ))),
        }
    }

    /// 全部学生，按姓氏升序
    pub async fn list(&self) -> Result<Vec<Student>> {
        let docs = self.store.list(&CollectionPath::root(STUDENTS)?).await?;
        let mut students: Vec<Student> = decode_all(&docs)?;
        students.sort_by(|a, b| a.last_name.cmp(&b.last_name));
        Ok(students)
    }

    pub async fn list_by_section(&self, section_id: &str) -> Result<Vec<Student>> {
        let mut students = self.list().await?;
        students.retain(|s| s.section_id.as_deref() == Some(section_id));
        Ok(students)
    }

    pub async fn search_by_last_name(&self, prefix: &str) -> Result<Vec<Student>> {
        let mut students = self.list().await?;
        students.retain(|s| has_prefix(&s.last_name, prefix));
        Ok(students)
    }

    pub async fn count(&self, section_id: Option<&str>) -> Result<usize> {
        Ok(match section_id {
            Some(section_id) => self.list_by_section(section_id).await?.len(),
            None => self.store.list(&CollectionPath::root(STUDENTS)?).await?.len(),
        })
    }
}
