pub mod scores;

pub mod sections;

pub mod students;

pub mod subjects;

pub mod system;

pub mod teachers;

use actix_web::{HttpResponse, Result as ActixResult};
use serde::Serialize;
use tracing::error;

use crate::errors::{Result, SchoolRecordsError};
use crate::models::ApiResponse;

pub use scores::configure_score_routes;
pub use sections::configure_section_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;

/// 将业务错误转换为 HTTP 响应
pub(crate) fn error_response(err: &SchoolRecordsError) -> HttpResponse {
    let body = ApiResponse::<()>::from(err);
    match err {
        SchoolRecordsError::AlreadyAssigned(_) => HttpResponse::Conflict().json(body),
        SchoolRecordsError::MissingRequiredField(_) | SchoolRecordsError::Validation(_) => {
            HttpResponse::BadRequest().json(body)
        }
        SchoolRecordsError::NotFound(_) => HttpResponse::NotFound().json(body),
        SchoolRecordsError::StoreTransactionConflict(_) => {
            HttpResponse::ServiceUnavailable().json(body)
        }
        _ => {
            error!("Request failed: {}", err.format_simple());
            HttpResponse::InternalServerError().json(body)
        }
    }
}

pub(crate) fn respond<T: Serialize>(result: Result<T>, message: &str) -> ActixResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Ok().json(ApiResponse::success(data, message))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) fn respond_created<T: Serialize>(
    result: Result<T>,
    message: &str,
) -> ActixResult<HttpResponse> {
    match result {
        Ok(data) => Ok(HttpResponse::Created().json(ApiResponse::success(data, message))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) fn respond_empty(result: Result<()>, message: &str) -> ActixResult<HttpResponse> {
    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(message))),
        Err(e) => Ok(error_response(&e)),
    }
}
