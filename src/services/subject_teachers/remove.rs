use tracing::{debug, info};

use super::SubjectTeacherService;
use crate::errors::Result;
use crate::repositories::{subject_path, teacher_subject_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn remove(
    service: &SubjectTeacherService,
    subject_id: &str,
    teacher_id: &str,
) -> Result<bool> {
    let subject_id = require_id("subjectId", subject_id)?;
    let teacher_id = require_id("teacherId", teacher_id)?;
    let subject = subject_path(subject_id)?;
    let join = teacher_subject_path(teacher_id, subject_id)?;

    let reads = ReadSet::new().doc(join.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        tx.update(
            subject.clone(),
            vec![("teacherIds".into(), FieldOp::array_remove(teacher_id))],
        );
        tx.delete(join.clone());
        snapshot.exists(&join)
    })
    .await?;

    if committed.value {
        info!("Teacher {} removed from subject {}", teacher_id, subject_id);
    } else {
        debug!(
            "Teacher {} was not assigned to subject {}, nothing to remove",
            teacher_id, subject_id
        );
    }
    Ok(committed.value)
}
