use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created, respond_empty};
use crate::errors::Result;
use crate::models::PaginatedResponse;
use crate::models::students::entities::Student;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::services::Services;

async fn list_filtered(services: &Services, params: &StudentListParams) -> Result<Vec<Student>> {
    let students = &services.repositories.students;
    let mut listed = match &params.search {
        Some(prefix) => students.search_by_last_name(prefix).await?,
        None => students.list().await?,
    };
    if let Some(section_id) = &params.section_id {
        listed.retain(|s| s.section_id.as_ref() == Some(section_id));
    }
    Ok(listed)
}

pub async fn list_students(
    services: web::Data<Services>,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    let params = query.into_inner();
    let result = list_filtered(&services, &params)
        .await
        .map(|students| PaginatedResponse::paginate(students, &params.pagination()));
    respond(result, "获取学生列表成功")
}

pub async fn create_student(
    services: web::Data<Services>,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.students.add(body.into_inner()).await;
    respond_created(result, "学生创建成功")
}

pub async fn get_student(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.students.get(&path).await, "获取学生成功")
}

pub async fn update_student(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.students.update(&path, &body).await;
    respond(result, "学生更新成功")
}

pub async fn delete_student(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond_empty(services.repositories.students.delete(&path).await, "学生已删除")
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .route("", web::get().to(list_students))
            .route("", web::post().to(create_student))
            .route("/{id}", web::get().to(get_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}", web::delete().to(delete_student)),
    );
}
