use tracing::{debug, info};

use super::SectionSubjectService;
use crate::errors::Result;
use crate::repositories::{section_path, section_subject_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn remove(
    service: &SectionSubjectService,
    section_id: &str,
    subject_id: &str,
) -> Result<bool> {
    let section_id = require_id("sectionId", section_id)?;
    let subject_id = require_id("subjectId", subject_id)?;
    let section = section_path(section_id)?;
    let join = section_subject_path(section_id, subject_id)?;

    let reads = ReadSet::new().doc(join.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        tx.update(
            section.clone(),
            vec![("subjectIds".into(), FieldOp::array_remove(subject_id))],
        );
        tx.delete(join.clone());
        snapshot.exists(&join)
    })
    .await?;

    if committed.value {
        info!("Subject {} removed from section {}", subject_id, section_id);
    } else {
        debug!(
            "Subject {} was not assigned to section {}, nothing to remove",
            subject_id, section_id
        );
    }
    Ok(committed.value)
}
