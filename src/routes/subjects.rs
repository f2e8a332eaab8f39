use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::models::subjects::requests::{CreateSubjectRequest, UpdateSubjectRequest};
use crate::services::Services;

pub async fn list_subjects(services: web::Data<Services>) -> ActixResult<HttpResponse> {
    respond(services.repositories.subjects.list().await, "获取科目列表成功")
}

pub async fn create_subject(
    services: web::Data<Services>,
    body: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.subjects.add(body.into_inner()).await;
    respond_created(result, "科目创建成功")
}

pub async fn get_subject(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.subjects.get(&path).await, "获取科目成功")
}

pub async fn update_subject(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.subjects.update(&path, &body).await;
    respond(result, "科目更新成功")
}

pub async fn delete_subject(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.cascade.delete_subject(&path).await, "科目已删除")
}

pub async fn list_subject_teachers(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.queries.teachers_of_subject(&path).await, "获取授课教师成功")
}

pub async fn assign_teacher(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (subject_id, teacher_id) = path.into_inner();
    let result = services.subject_teachers.assign(&subject_id, &teacher_id).await;
    respond_created(result, "教师分配成功")
}

pub async fn remove_teacher(
    services: web::Data<Services>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (subject_id, teacher_id) = path.into_inner();
    let result = services.subject_teachers.remove(&subject_id, &teacher_id).await;
    respond(result, "教师已移除")
}

// 配置路由
pub fn configure_subject_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .route("", web::get().to(list_subjects))
            .route("", web::post().to(create_subject))
            .route("/{id}", web::get().to(get_subject))
            .route("/{id}", web::put().to(update_subject))
            .route("/{id}", web::delete().to(delete_subject))
            .route("/{id}/teachers", web::get().to(list_subject_teachers))
            .route("/{id}/teachers/{teacher_id}", web::post().to(assign_teacher))
            .route("/{id}/teachers/{teacher_id}", web::delete().to(remove_teacher)),
    );
}
