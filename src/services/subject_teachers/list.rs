use super::SubjectTeacherService;
use crate::errors::Result;
use crate::models::assignments::entities::TeacherSubject;
use crate::repositories::teacher_subjects_path;
use crate::store::DocumentStore;
use crate::utils::validate::require_id;

pub async fn list(
    service: &SubjectTeacherService,
    teacher_id: &str,
) -> Result<Vec<TeacherSubject>> {
    let teacher_id = require_id("teacherId", teacher_id)?;
    let docs = service.store.list(&teacher_subjects_path(teacher_id)?).await?;
    let mut joins = docs
        .iter()
        .map(|doc| doc.decode::<TeacherSubject>())
        .collect::<Result<Vec<_>>>()?;
    joins.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(joins)
}
