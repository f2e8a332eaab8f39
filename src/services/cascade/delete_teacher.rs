use tracing::info;

use super::{CascadeService, CascadeSummary};
use crate::errors::{Result, SchoolRecordsError};
use crate::repositories::{subject_path, teacher_path, teacher_subjects_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn delete_teacher(service: &CascadeService, teacher_id: &str) -> Result<CascadeSummary> {
    let teacher_id = require_id("Teacher ID", teacher_id)?;
    let teacher = teacher_path(teacher_id)?;
    let joins = teacher_subjects_path(teacher_id)?;

    let reads = ReadSet::new().doc(teacher.clone()).collection(joins.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        if !snapshot.exists(&teacher)? {
            return Err(SchoolRecordsError::not_found(format!(
                "Teacher {teacher_id} not found"
            )));
        }
        let mut summary = CascadeSummary::default();
        for join in snapshot.children(&joins)? {
            tx.delete(join.path.clone());
            tx.update_if_exists(
                subject_path(join.id())?,
                vec![("teacherIds".into(), FieldOp::array_remove(teacher_id))],
            );
            summary.joins_deleted += 1;
            summary.back_references_updated += 1;
        }
        tx.delete(teacher.clone());
        Ok(summary)
    })
    .await?;

    info!(
        "Teacher {} deleted with {} subject assignment(s)",
        teacher_id, committed.value.joins_deleted
    );
    Ok(committed.value)
}
