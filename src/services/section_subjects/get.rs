use super::SectionSubjectService;
use crate::errors::{Result, SchoolRecordsError};
use crate::models::assignments::entities::SectionSubject;
use crate::repositories::section_subject_path;
use crate::store::DocumentStore;
use crate::utils::validate::require_id;

pub async fn get(
    service: &SectionSubjectService,
    section_id: &str,
    subject_id: &str,
) -> Result<SectionSubject> {
    let section_id = require_id("sectionId", section_id)?;
    let subject_id = require_id("subjectId", subject_id)?;
    match service
        .store
        .get(&section_subject_path(section_id, subject_id)?)
        .await?
    {
        Some(doc) => doc.decode(),
        None => Err(SchoolRecordsError::not_found(format!(
            "Subject {subject_id} is not assigned to section {section_id}"
        ))),
    }
}
