use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::assignments::requests::TeacherSubjectUpdate;
use crate::models::teachers::entities::Teacher;
use crate::models::teachers::requests::{
    CreateTeacherRequest, SetVerifiedRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::services::Services;

async fn list_filtered(services: &Services, params: &TeacherListParams) -> Result<Vec<Teacher>> {
    let teachers = &services.repositories.teachers;
    let mut listed = match (&params.search, params.verified) {
        (Some(prefix), _) => teachers.search_by_last_name(prefix).await?,
        (None, Some(verified)) => teachers.list_by_verified(verified).await?,
        (None, None) => teachers.list().await?,
    };
    if let (Some(_), Some(verified)) = (&params.search, params.verified) {
        listed.retain(|t| t.verified == verified);
    }
    Ok(listed)
}

// HTTP处理程序
pub async fn list_teachers(
    services: web::Data<Services>,
    query: web::Query<TeacherListParams>,
) -> ActixResult<HttpResponse> {
    let params = query.into_inner();
    let result = list_filtered(&services, &params)
        .await
        .map(|teachers| PaginatedResponse::paginate(teachers, &params.pagination()));
    respond(result, "获取教师列表成功")
}

pub async fn create_teacher(
    services: web::Data<Services>,
    body: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.teachers.add(body.into_inner()).await;
    respond_created(result, "教师创建成功")
}

pub async fn get_teacher(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.teachers.get(&path).await, "获取教师成功")
}

pub async fn update_teacher(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.teachers.update(&path, &body).await;
    respond(result, "教师更新成功")
}

pub async fn set_verified(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<SetVerifiedRequest>,
) -> ActixResult<HttpResponse> {
    let result = services
        .repositories
        .teachers
        .set_verified(&path, body.verified)
        .await;
    respond(result, "审核状态已更新")
}

pub async fn delete_teacher(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.cascade.delete_teacher(&path).await, "教师已删除")
}

pub async fn list_teacher_subjects(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.subject_teachers.list(&path).await, "获取教师科目成功")
}

pub async fn get_teacher_subject(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (teacher_id, subject_id) = path.into_inner();
    let result = services.subject_teachers.get(&teacher_id, &subject_id).await;
    respond(result, "获取成绩册成功")
}

/// 更新成绩册，路径中的科目 ID 优先于请求体
pub async fn update_teacher_subject(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
    body: web::Json<TeacherSubjectUpdate>,
) -> ActixResult<HttpResponse> {
    let (teacher_id, subject_id) = path.into_inner();
    let mut update = body.into_inner();
    update.id = subject_id;
    let result = services
        .subject_teachers
        .update_teacher_subject(&teacher_id, &update)
        .await;
    respond(result, "成绩册更新成功")
}

pub async fn list_taught_subjects(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.queries.subjects_taught_by(&path).await, "获取所授科目成功")
}

pub async fn list_section_subjects(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let result = services.queries.section_subjects_taught_by(&path).await;
    respond(result, "获取授课班级成功")
}

pub async fn list_advisory_sections(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.queries.sections_by_adviser(&path).await, "获取班主任班级成功")
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/teachers")
            .route("", web::get().to(list_teachers))
            .route("", web::post().to(create_teacher))
            .route("/{id}", web::get().to(get_teacher))
            .route("/{id}", web::put().to(update_teacher))
            .route("/{id}", web::delete().to(delete_teacher))
            .route("/{id}/verified", web::put().to(set_verified))
            .route("/{id}/subjects", web::get().to(list_teacher_subjects))
            .route("/{id}/taught-subjects", web::get().to(list_taught_subjects))
            .route("/{id}/section-subjects", web::get().to(list_section_subjects))
            .route("/{id}/advisory-sections", web::get().to(list_advisory_sections))
            .route("/{id}/subjects/{subject_id}", web::get().to(get_teacher_subject))
            .route(
                "/{id}/subjects/{subject_id}",
                web::put().to(update_teacher_subject),
            ),
    );
}
