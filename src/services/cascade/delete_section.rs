use tracing::info;

use super::{CascadeService, CascadeSummary};
use crate::errors::{Result, SchoolRecordsError};
use crate::repositories::{section_path, section_subjects_path};
use crate::store::{ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn delete_section(service: &CascadeService, section_id: &str) -> Result<CascadeSummary> {
    let section_id = require_id("Section ID", section_id)?;
    let section = section_path(section_id)?;
    let joins = section_subjects_path(section_id)?;

    let reads = ReadSet::new().doc(section.clone()).collection(joins.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        if !snapshot.exists(&section)? {
            return Err(SchoolRecordsError::not_found(format!(
                "Section {section_id} not found"
            )));
        }
        let mut summary = CascadeSummary::default();
        for join in snapshot.children(&joins)? {
            tx.delete(join.path.clone());
            summary.joins_deleted += 1;
        }
        tx.delete(section.clone());
        Ok(summary)
    })
    .await?;

    info!(
        "Section {} deleted with {} subject assignment(s)",
        section_id, committed.value.joins_deleted
    );
    Ok(committed.value)
}
