use super::SectionSubjectService;
use crate::errors::Result;
use crate::models::assignments::entities::SectionSubject;
use crate::repositories::section_subjects_path;
use crate::store::DocumentStore;
use crate::utils::validate::require_id;

pub async fn list(
    service: &SectionSubjectService,
    section_id: &str,
) -> Result<Vec<SectionSubject>> {
    let section_id = require_id("sectionId", section_id)?;
    let docs = service.store.list(&section_subjects_path(section_id)?).await?;
    let mut joins = docs
        .iter()
        .map(|doc| doc.decode::<SectionSubject>())
        .collect::<Result<Vec<_>>>()?;
    joins.sort_by(|a, b| a.assigned_at.cmp(&b.assigned_at).then_with(|| a.id.cmp(&b.id)));
    Ok(joins)
}
