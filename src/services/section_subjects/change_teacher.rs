use tracing::info;

use super::SectionSubjectService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::SectionSubject;
use crate::repositories::section_subject_path;
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn change_teacher(
    service: &SectionSubjectService,
    section_id: &str,
    subject_id: &str,
    teacher_id: &str,
) -> Result<SectionSubject> {
    let section_id = require_id("sectionId", section_id)?;
    let subject_id = require_id("subjectId", subject_id)?;
    let teacher_id = require_id("teacherId", teacher_id)?;
    let join = section_subject_path(section_id, subject_id)?;

    let reads = ReadSet::new().doc(join.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        let mut current: SectionSubject = snapshot
            .get(&join)?
            .ok_or_else(|| {
                SchoolRecordsError::not_found(format!(
                    "Subject {subject_id} is not assigned to section {section_id}"
                ))
            })?
            .decode()?;
        tx.update(
            join.clone(),
            vec![("subjectTeacherId".into(), FieldOp::value(teacher_id))],
        );
        current.subject_teacher_id = teacher_id.to_string();
        Ok(current)
    })
    .await?;

    info!(
        "Section {} subject {} now taught by teacher {}",
        section_id, subject_id, teacher_id
    );
    Ok(committed.value)
}
