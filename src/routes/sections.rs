use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::assignments::requests::{
    AssignSectionSubjectRequest, ChangeSectionTeacherRequest,
};
use crate::models::sections::entities::Section;
use crate::models::sections::requests::{
    CreateSectionRequest, SectionListParams, SetAdviserRequest, UpdateSectionRequest,
};
use crate::services::Services;

async fn list_filtered(services: &Services, params: &SectionListParams) -> Result<Vec<Section>> {
    let sections = &services.repositories.sections;
    let mut listed = match params.year_level {
        Some(level) => sections.list_by_year_level(level).await?,
        None => sections.list().await?,
    };
    if let Some(adviser_id) = &params.adviser_id {
        listed.retain(|s| s.adviser_id.as_ref() == Some(adviser_id));
    }
    Ok(listed)
}

pub async fn list_sections(
    services: web::Data<Services>,
    query: web::Query<SectionListParams>,
) -> ActixResult<HttpResponse> {
    let params = query.into_inner();
    let result = list_filtered(&services, &params)
        .await
        .map(|sections| PaginatedResponse::paginate(sections, &params.pagination()));
    respond(result, "获取班级列表成功")
}

pub async fn create_section(
    services: web::Data<Services>,
    body: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.sections.add(body.into_inner()).await;
    respond_created(result, "班级创建成功")
}

pub async fn get_section(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.sections.get(&path).await, "获取班级成功")
}

pub async fn update_section(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.sections.update(&path, &body).await;
    respond(result, "班级更新成功")
}

pub async fn delete_section(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.cascade.delete_section(&path).await, "班级已删除")
}

pub async fn set_adviser(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<SetAdviserRequest>,
) -> ActixResult<HttpResponse> {
    let result = services
        .repositories
        .sections
        .set_adviser(&path, &body.adviser_id)
        .await;
    respond(result, "班主任已设置")
}

pub async fn remove_adviser(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.sections.remove_adviser(&path).await, "班主任已移除")
}

pub async fn list_section_subjects(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.section_subjects.list(&path).await, "获取班级科目成功")
}

pub async fn assign_subject(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<AssignSectionSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let result = services
        .section_subjects
        .assign(&path, &body.subject_id, &body.teacher_id)
        .await;
    respond_created(result, "科目分配成功")
}

pub async fn get_section_subject(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (section_id, subject_id) = path.into_inner();
    let result = services.section_subjects.get(&section_id, &subject_id).await;
    respond(result, "获取班级科目成功")
}

pub async fn change_teacher(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
    body: web::Json<ChangeSectionTeacherRequest>,
) -> ActixResult<HttpResponse> {
    let (section_id, subject_id) = path.into_inner();
    let result = services
        .section_subjects
        .change_teacher(&section_id, &subject_id, &body.teacher_id)
        .await;
    respond(result, "授课教师已更换")
}

pub async fn remove_subject(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (section_id, subject_id) = path.into_inner();
    let result = services.section_subjects.remove(&section_id, &subject_id).await;
    respond(result, "科目已移除")
}

// 配置路由
pub fn configure_section_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sections")
            .route("", web::get().to(list_sections))
            .route("", web::post().to(create_section))
            .route("/{id}", web::get().to(get_section))
            .route("/{id}", web::put().to(update_section))
            .route("/{id}", web::delete().to(delete_section))
            .route("/{id}/adviser", web::put().to(set_adviser))
            .route("/{id}/adviser", web::delete().to(remove_adviser))
            .route("/{id}/subjects", web::get().to(list_section_subjects))
            .route("/{id}/subjects", web::post().to(assign_subject))
            .route("/{id}/subjects/{subject_id}", web::get().to(get_section_subject))
            .route("/{id}/subjects/{subject_id}", web::put().to(change_teacher))
            .route("/{id}/subjects/{subject_id}", web::delete().to(remove_subject)),
    );
}
