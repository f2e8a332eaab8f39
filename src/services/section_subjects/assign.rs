use chrono::SubsecRound;
use tracing::info;

use super::SectionSubjectService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::SectionSubject;
use crate::repositories::{section_path, section_subject_path};
use crate::store::{FieldOp, ReadSet, run_transaction};
use crate::utils::validate::require_id;

pub async fn assign(
    service: &SectionSubjectService,
    section_id: &str,
    subject_id: &str,
    teacher_id: &str,
) -> Result<SectionSubject> {
    let section_id = require_id("sectionId", section_id)?;
    let subject_id = require_id("subjectId", subject_id)?;
    let teacher_id = require_id("teacherId", teacher_id)?;
    let section = section_path(section_id)?;
    let join = section_subject_path(section_id, subject_id)?;

    let reads = ReadSet::new().doc(section.clone()).doc(join.clone());
    let store = service.store.as_ref();
    let committed = run_transaction(store, &service.options, &reads, |snapshot, tx| {
        let section_name = snapshot
            .get(&section)?
            .ok_or_else(|| {
                SchoolRecordsError::not_found(format!("Section {section_id} not found"))
            })?
            .get_str("name")
            .unwrap_or_default()
            .to_string();

        tx.update(
            section.clone(),
            vec![("subjectIds".into(), FieldOp::array_union(subject_id))],
        );
        if snapshot.exists(&join)? {
            return Err(SchoolRecordsError::already_assigned(format!(
                "Subject {subject_id} is already assigned to section {section_id}"
            )));
        }
        tx.set(
            join.clone(),
            vec![
                ("subjectTeacherId".into(), FieldOp::value(teacher_id)),
                ("sectionId".into(), FieldOp::value(section_id)),
                ("sectionName".into(), FieldOp::value(section_name.as_str())),
                ("assignedAt".into(), FieldOp::ServerTimestamp),
            ],
        );
        Ok(section_name)
    })
    .await?;

    info!(
        "Subject {} assigned to section {} with teacher {}",
        subject_id, section_id, teacher_id
    );
    Ok(SectionSubject {
        id: subject_id.to_string(),
        subject_teacher_id: teacher_id.to_string(),
        section_id: section_id.to_string(),
        section_name: committed.value,
        assigned_at: committed.commit.commit_time.trunc_subsecs(6),
    })
}
