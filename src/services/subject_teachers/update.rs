use tracing::debug;

use super::SubjectTeacherService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::TeacherSubject;
use crate::models::assignments::requests::TeacherSubjectUpdate;
use crate::models::gradebook::Gradebook;
use crate::repositories::teacher_subject_path;
use crate::store::{ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn update_teacher_subject(
    service: &SubjectTeacherService,
    teacher_id: &str,
    update: &TeacherSubjectUpdate,
) -> Result<TeacherSubject> {
    let teacher_id = require_id("teacherId", teacher_id)?;
    let subject_id = require_id("teacherSubject.id", &update.id)?;
    if let Some(linked) = &update.teacher_subject_id
        && linked != subject_id
    {
        return Err(SchoolRecordsError::validation(format!(
            "teacherSubjectId is immutable (expected {subject_id}, got {linked})"
        )));
    }
    let changes = Gradebook::from(update.fields.clone());
    changes.validate()?;
    let join = teacher_subject_path(teacher_id, subject_id)?;

    let reads = ReadSet::new().doc(join.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        let mut current: TeacherSubject = snapshot
            .get(&join)?
            .ok_or_else(|| {
                SchoolRecordsError::not_found(format!(
                    "Subject {subject_id} is not assigned to teacher {teacher_id}"
                ))
            })?
            .decode()?;
        tx.update(join.clone(), changes.field_writes());
        for (field, value) in &update.fields {
            current.gradebook.set(field, *value)?;
        }
        Ok(current)
    })
    .await?;

    debug!(
        "Gradebook of teacher {} for subject {} updated ({} field(s))",
        teacher_id,
        subject_id,
        changes.len()
    );
    Ok(committed.value)
}
