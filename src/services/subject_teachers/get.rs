use super::SubjectTeacherService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::TeacherSubject;
use crate::repositories::teacher_subject_path;
use crate::store::DocumentStore;
use crate::utils::validate::require_id;

pub async fn get(
    service: &SubjectTeacherService,
    teacher_id: &str,
    subject_id: &str,
) -> Result<TeacherSubject> {
    let teacher_id = require_id("teacherId", teacher_id)?;
    let subject_id = require_id("subjectId", subject_id)?;
    match service
        .store
        .get(&teacher_subject_path(teacher_id, subject_id)?)
        .await?
    {
        Some(doc) => doc.decode(),
        None => Err(SchoolRecordsError::not_found(format!(
            "Subject {subject_id} is not assigned to teacher {teacher_id}"
        ))),
    }
}
