//! 只读查询视图，建立在关联记录与反向索引之上

use std::sync::Arc;

use serde::Serialize;

use crate::errors::Result;
use crate::models::assignments::entities::{SectionSubject, TeacherSubject};
use crate::models::sections::entities::Section;
use crate::models::subjects::entities::Subject;
use crate::models::teachers::entities::Teacher;
use crate::repositories::{
    Repositories, SECTION_SUBJECTS, subject_path, teacher_path, teacher_subjects_path,
};
use crate::store::{Document, DocumentStore};
use crate::utils::validate::require_id;

/// 首页统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub teachers: usize,
    pub verified_teachers: usize,
    pub unverified_teachers: usize,
    pub subjects: usize,
    pub sections: usize,
    pub students: usize,
}

#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn DocumentStore>,
    repositories: Repositories,
}

impl QueryService {
    pub fn new(store: Arc<dyn DocumentStore>, repositories: Repositories) -> Self {
        Self {
            store,
            repositories,
        }
    }

    /// 教师名下的科目关联记录
    pub async fn teacher_subjects(&self, teacher_id: &str) -> Result<Vec<TeacherSubject>> {
        let teacher_id = require_id("teacherId", teacher_id)?;
        let docs = self.store.list(&teacher_subjects_path(teacher_id)?).await?;
        decode_sorted(&docs)
    }

    /// 教师所教科目，解析为科目文档（已删除的科目被忽略）
    pub async fn subjects_taught_by(&self, teacher_id: &str) -> Result<Vec<Subject>> {
        let mut subjects = Vec::new();
        for join in self.teacher_subjects(teacher_id).await? {
            if let Some(doc) = self.store.get(&subject_path(&join.id)?).await? {
                subjects.push(doc.decode()?);
            }
        }
        Ok(subjects)
    }

    /// 所有班级中由该教师授课的科目关联
    pub async fn section_subjects_taught_by(&self, teacher_id: &str) -> Result<Vec<SectionSubject>> {
        let teacher_id = require_id("teacherId", teacher_id)?;
        let docs = self.store.list_group(SECTION_SUBJECTS).await?;
        let mut joins = docs
            .iter()
            .filter(|doc| doc.get_str("subjectTeacherId") == Some(teacher_id))
            .map(Document::decode::<SectionSubject>)
            .collect::<Result<Vec<_>>>()?;
        joins.sort_by(|a, b| {
            a.section_name
                .cmp(&b.section_name)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(joins)
    }

    /// 科目的授课教师，按 `teacherIds` 解析
    pub async fn teachers_of_subject(&self, subject_id: &str) -> Result<Vec<Teacher>> {
        let subject = self.repositories.subjects.get(subject_id).await?;
        let mut teachers = Vec::new();
        for teacher_id in &subject.teacher_ids {
            if let Some(doc) = self.store.get(&teacher_path(teacher_id)?).await? {
                teachers.push(doc.decode()?);
            }
        }
        Ok(teachers)
    }

    pub async fn sections_by_adviser(&self, teacher_id: &str) -> Result<Vec<Section>> {
        self.repositories.sections.list_by_adviser(teacher_id).await
    }

    pub async fn sections_by_year_level(&self, year_level: u32) -> Result<Vec<Section>> {
        self.repositories.sections.list_by_year_level(year_level).await
    }

    pub async fn counts(&self) -> Result<DashboardCounts> {
        let teachers = &self.repositories.teachers;
        Ok(DashboardCounts {
            teachers: teachers.count_non_admin().await?,
            verified_teachers: teachers.count_by_verified(true).await?,
            unverified_teachers: teachers.count_by_verified(false).await?,
            subjects: self.repositories.subjects.count().await?,
            sections: self.repositories.sections.count(None).await?,
            students: self.repositories.students.count(None).await?,
        })
    }
}

fn decode_sorted(docs: &[Document]) -> Result<Vec<TeacherSubject>> {
    let mut joins = docs
        .iter()
        .map(Document::decode::<TeacherSubject>)
        .collect::<Result<Vec<_>>>()?;
    joins.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(joins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subjects::requests::CreateSubjectRequest;
    use crate::models::sections::requests::CreateSectionRequest;
    use crate::models::teachers::entities::TeacherRole;
    use crate::models::teachers::requests::CreateTeacherRequest;
    use crate::services::Services;
    use crate::store::TransactionOptions;
    use crate::store::memory::MemoryStore;

    fn teacher(last_name: &str) -> CreateTeacherRequest {
        CreateTeacherRequest {
            last_name: last_name.to_string(),
            first_name: "Lee".to_string(),
            email: "lee@school.edu".to_string(),
            username: last_name.to_lowercase(),
            role: TeacherRole::Teacher,
            verified: true,
            middle_name: None,
            contact_number: None,
            age: None,
            gender: None,
        }
    }

    #[tokio::test]
    async fn test_views_follow_assignments() {
        let services = Services::new(Arc::new(MemoryStore::new()), TransactionOptions::default());
        let repos = &services.repositories;
        let t1 = repos.teachers.add(teacher("Cruz")).await.unwrap();
        let t2 = repos.teachers.add(teacher("Dela Paz")).await.unwrap();
        let math = repos
            .subjects
            .add(CreateSubjectRequest {
                name: "Math".into(),
                track: "Core".into(),
                semester: "1st".into(),
            })
            .await
            .unwrap();
        let section = repos
            .sections
            .add(CreateSectionRequest {
                name: "Grade 10 - A".into(),
                strand: "STEM".into(),
                year_level: 10,
                adviser_id: Some(t2.id.clone()),
            })
            .await
            .unwrap();

        services.subject_teachers.assign(&math.id, &t1.id).await.unwrap();
        services
            .section_subjects
            .assign(&section.id, &math.id, &t1.id)
            .await
            .unwrap();

        let queries = &services.queries;
        let subjects = queries.subjects_taught_by(&t1.id).await.unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].teacher_ids, vec![t1.id.clone()]);

        let taught = queries.section_subjects_taught_by(&t1.id).await.unwrap();
        assert_eq!(taught.len(), 1);
        assert_eq!(taught[0].section_id, section.id);
        assert!(queries.section_subjects_taught_by(&t2.id).await.unwrap().is_empty());

        let teachers = queries.teachers_of_subject(&math.id).await.unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].id, t1.id);

        assert_eq!(queries.sections_by_adviser(&t2.id).await.unwrap().len(), 1);
        assert_eq!(queries.sections_by_year_level(11).await.unwrap().len(), 0);

        let counts = queries.counts().await.unwrap();
        assert_eq!(counts.teachers, 2);
        assert_eq!(counts.subjects, 1);
        assert_eq!(counts.sections, 1);
    }
}
