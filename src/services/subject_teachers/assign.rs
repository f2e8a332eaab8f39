use tracing::info;

use super::SubjectTeacherService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::TeacherSubject;
use crate::models::gradebook::Gradebook;
use crate::repositories::{subject_path, teacher_subject_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn assign(
    service: &SubjectTeacherService,
    subject_id: &str,
    teacher_id: &str,
) -> Result<TeacherSubject> {
    let subject_id = require_id("subjectId", subject_id)?;
    let teacher_id = require_id("teacherId", teacher_id)?;
    let subject = subject_path(subject_id)?;
    let join = teacher_subject_path(teacher_id, subject_id)?;
    let gradebook = Gradebook::seeded();

    let reads = ReadSet::new().doc(join.clone());
    let store = service.store.as_ref();
    run_transaction(store, &service.options, &reads, |snapshot, tx| {
        tx.update(
            subject.clone(),
            vec![("teacherIds".into(), FieldOp::array_union(teacher_id))],
        );
        if snapshot.exists(&join)? {
            return Err(SchoolRecordsError::already_assigned(format!(
                "Teacher {teacher_id} is already assigned to subject {subject_id}"
            )));
        }
        let mut fields = vec![("teacherSubjectId".to_string(), FieldOp::value(subject_id))];
        fields.extend(gradebook.field_writes());
        tx.set(join.clone(), fields);
        Ok(())
    })
    .await?;

    info!("Teacher {} assigned to subject {}", teacher_id, subject_id);
    Ok(TeacherSubject {
        id: subject_id.to_string(),
        teacher_subject_id: subject_id.to_string(),
        gradebook,
    })
}
