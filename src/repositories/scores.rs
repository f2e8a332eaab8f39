use std::sync::Arc;

use tracing::debug;

use super::{SCORES, decode_all, teacher_subject_path};
use crate::errors::{Result, SchoolRecordsError};
use crate::models::gradebook::Gradebook;
use crate::models::scores::entities::Score;
use crate::models::scores::requests::InitialScoreDetails;
use crate::store::{
    CollectionPath, DocPath, DocumentStore, ReadSet, TransactionOptions, Write, document,
    run_transaction,
};
use crate::utils::random_code::generate_document_id;
use crate::utils::validate::require_id;

fn score_path(id: &str) -> Result<DocPath> {
    DocPath::root(SCORES, id)
}

/// 成绩仓储
#[derive(Clone)]
pub struct ScoreRepository {
    store: Arc<dyn DocumentStore>,
    options: TransactionOptions,
}

impl ScoreRepository {
    pub fn new(store: Arc<dyn DocumentStore>, options: TransactionOptions) -> Self {
        Self { store, options }
    }

    /// 新建成绩记录，成绩册全部置 0
    ///
    /// 对应的教师-科目关联必须已经存在，检查与写入在同一事务内完成。
    pub async fn create(&self, details: InitialScoreDetails) -> Result<Score> {
        require_id("studentId", &details.student_id)?;
        let teacher_id = require_id("teacherSubjectId", &details.teacher_subject_id)?;
        let subject_id = require_id("subjectId", &details.subject_id)?;
        let join = teacher_subject_path(teacher_id, subject_id)?;

        let score = Score {
            id: generate_document_id(),
            student_id: details.student_id.clone(),
            student_last_name: details.student_last_name.clone(),
            student_first_name: details.student_first_name.clone(),
            student_gender: details.student_gender.clone(),
            subject_id: details.subject_id.clone(),
            subject_name: details.subject_name.clone(),
            subject_track: details.subject_track.clone(),
            section_id: details.section_id.clone(),
            section_name: details.section_name.clone(),
            teacher_subject_id: details.teacher_subject_id.clone(),
            semester: details.semester.clone(),
            gradebook: Gradebook::seeded(),
            initial_grade: 0.0,
            final_grade: 0.0,
        };
        let path = score_path(&score.id)?;

        let reads = ReadSet::new().doc(join.clone());
        run_transaction(self.store.as_ref(), &self.options, &reads, |snapshot, tx| {
            if !snapshot.exists(&join)? {
                return Err(SchoolRecordsError::not_found(format!(
                    "Subject {subject_id} is not assigned to teacher {teacher_id}"
                )));
            }
            tx.set_model(path.clone(), &score)?;
            Ok(())
        })
        .await?;

        debug!("Score {} created for student {}", score.id, score.student_id);
        Ok(score)
    }

    /// 保存成绩，ID 为空时新建记录并返回新 ID
    pub async fn update_score(&self, score: &Score) -> Result<String> {
        score.gradebook.validate()?;
        if score.id.is_empty() {
            let mut created = score.clone();
            created.id = generate_document_id();
            self.store
                .apply(vec![Write::set_model(score_path(&created.id)?, &created)?])
                .await?;
            return Ok(created.id);
        }

        let mut data = document::encode_model(score)?;
        data.remove("id");
        self.store
            .apply(vec![Write::Update {
                path: score_path(&score.id)?,
                fields: document::into_field_writes(data),
            }])
            .await?;
        Ok(score.id.clone())
    }

    pub async fn get(&self, id: &str) -> Result<Score> {
        let id = require_id("Score ID", id)?;
        match self.store.get(&score_path(id)?).await? {
            Some(doc) => doc.decode(),
            None => Err(SchoolRecordsError::not_found(format!("Score {id} not found"))),
        }
    }

    /// 学生的全部成绩，按学生姓氏降序
    pub async fn list_by_student(&self, student_id: &str) -> Result<Vec<Score>> {
        let mut scores = self.all().await?;
        scores.retain(|s| s.student_id == student_id);
        scores.sort_by(|a, b| b.student_last_name.cmp(&a.student_last_name));
        Ok(scores)
    }

    /// 班级的全部成绩，按学生性别降序
    pub async fn list_by_section(&self, section_id: &str) -> Result<Vec<Score>> {
        let mut scores = self.all().await?;
        scores.retain(|s| s.section_id == section_id);
        scores.sort_by(|a, b| b.student_gender.cmp(&a.student_gender));
        Ok(scores)
    }

    async fn all(&self) -> Result<Vec<Score>> {
        let docs = self.store.list(&CollectionPath::root(SCORES)?).await?;
        decode_all(&docs)
    }
}
