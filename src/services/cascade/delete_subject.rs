use tracing::info;

use super::{CascadeService, CascadeSummary};
use crate::errors::{Result, SchoolRecordsError};
use crate::repositories::{SECTION_SUBJECTS, subject_path, teacher_subject_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn delete_subject(service: &CascadeService, subject_id: &str) -> Result<CascadeSummary> {
    let subject_id = require_id("Subject ID", subject_id)?;
    let subject = subject_path(subject_id)?;

    let reads = ReadSet::new().doc(subject.clone()).group(SECTION_SUBJECTS);
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        let current = snapshot.get(&subject)?.ok_or_else(|| {
            SchoolRecordsError::not_found(format!("Subject {subject_id} not found"))
        })?;
        let mut summary = CascadeSummary::default();
        for teacher_id in current.string_array("teacherIds") {
            tx.delete(teacher_subject_path(&teacher_id, subject_id)?);
            summary.joins_deleted += 1;
        }
        for join in snapshot
            .group(SECTION_SUBJECTS)?
            .iter()
            .filter(|doc| doc.id() == subject_id)
        {
            tx.delete(join.path.clone());
            summary.joins_deleted += 1;
            if let Some(section) = join.path.parent().parent() {
                tx.update_if_exists(
                    section,
                    vec![("subjectIds".into(), FieldOp::array_remove(subject_id))],
                );
                summary.back_references_updated += 1;
            }
        }
        tx.delete(subject.clone());
        Ok(summary)
    })
    .await?;

    info!(
        "Subject {} deleted with {} assignment(s)",
        subject_id, committed.value.joins_deleted
    );
    Ok(committed.value)
}
