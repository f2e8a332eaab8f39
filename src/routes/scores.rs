use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{respond, respond_created};
use crate::errors::SchoolRecordsError;
use crate::models::scores::entities::Score;
use crate::models::scores::requests::{InitialScoreDetails, ScoreListParams};
use crate::services::Services;

/// 按学生或班级列出成绩，两者必须提供其一
pub async fn list_scores(
    services: web::Data<Services>,
    query: web::Query<ScoreListParams>,
) -> ActixResult<HttpResponse> {
    let scores = &services.repositories.scores;
    let result = match (&query.student_id, &query.section_id) {
        (Some(student_id), _) => scores.list_by_student(student_id).await,
        (None, Some(section_id)) => scores.list_by_section(section_id).await,
        (None, None) => Err(SchoolRecordsError::missing_required_field(
            "studentId or sectionId is required",
        )),
    };
    respond(result, "获取成绩列表成功")
}

pub async fn create_score(
    services: web::Data<Services>,
    body: web::Json<InitialScoreDetails>,
) -> ActixResult<HttpResponse> {
    let result = services.repositories.scores.create(body.into_inner()).await;
    respond_created(result, "成绩记录创建成功")
}

pub async fn get_score(
    services: web::Data<Services>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    respond(services.repositories.scores.get(&path).await, "获取成绩成功")
}

pub async fn update_score(
    services: web::Data<Services>,
    path: web::Path<String>,
    body: web::Json<Score>,
) -> ActixResult<HttpResponse> {
    let mut score = body.into_inner();
    score.id = path.into_inner();
    let scores = &services.repositories.scores;
    let result = match scores.update_score(&score).await {
        Ok(id) => scores.get(&id).await,
        Err(e) => Err(e),
    };
    respond(result, "成绩已保存")
}

// 配置路由
pub fn configure_score_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/scores")
            .route("", web::get().to(list_scores))
            .route("", web::post().to(create_score))
            .route("/{id}", web::get().to(get_score))
            .route("/{id}", web::put().to(update_score)),
    );
}
