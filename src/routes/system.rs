use actix_web::{HttpResponse, Result as ActixResult, web};

use super::respond;
use crate::config::AppConfig;
use crate::models::AppStartTime;
use crate::models::system::responses::{ConsistencyReport, HealthResponse, RepairResponse};
use crate::services::Services;

pub async fn health(
    services: web::Data<Services>,
    start_time: web::Data<AppStartTime>,
) -> ActixResult<HttpResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(start_time.start_datetime)
        .num_seconds();
    respond(
        Ok(HealthResponse {
            status: "ok".to_string(),
            system_name: AppConfig::get().app.system_name.clone(),
            store_backend: services.store.backend_name().to_string(),
            uptime_seconds: uptime,
        }),
        "服务运行正常",
    )
}

pub async fn counts(services: web::Data<Services>) -> ActixResult<HttpResponse> {
    respond(services.queries.counts().await, "获取统计成功")
}

pub async fn audit(services: web::Data<Services>) -> ActixResult<HttpResponse> {
    let result = services
        .consistency
        .audit()
        .await
        .map(|drifts| ConsistencyReport {
            consistent: drifts.is_empty(),
            drifts,
        });
    respond(result, "一致性检查完成")
}

pub async fn repair(services: web::Data<Services>) -> ActixResult<HttpResponse> {
    let consistency = &services.consistency;
    let result = match consistency.repair().await {
        Ok(repaired) => consistency
            .audit()
            .await
            .map(|remaining| RepairResponse { repaired, remaining }),
        Err(e) => Err(e),
    };
    respond(result, "反向索引已重建")
}

// 配置路由
pub fn configure_system_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/system")
            .route("/health", web::get().to(health))
            .route("/counts", web::get().to(counts))
            .route("/consistency", web::get().to(audit))
            .route("/consistency/repair", web::post().to(repair)),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::models::AppStartTime;
    use crate::routes;
    use crate::services::Services;
    use crate::store::TransactionOptions;
    use crate::store::memory::MemoryStore;

    macro_rules! test_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new(Services::new(
                        Arc::new(MemoryStore::new()),
                        TransactionOptions::default(),
                    )))
                    .app_data(actix_web::web::Data::new(AppStartTime {
                        start_datetime: chrono::Utc::now(),
                    }))
                    .configure(routes::configure_teacher_routes)
                    .configure(routes::configure_subject_routes)
                    .configure(routes::configure_section_routes)
                    .configure(routes::configure_student_routes)
                    .configure(routes::configure_score_routes)
                    .configure(routes::configure_system_routes),
            )
            .await
        };
    }

    // 创建资源并返回新 ID
    macro_rules! created_id {
        ($app:expr, $uri:expr, $body:expr) => {{
            let req = test::TestRequest::post()
                .uri($uri)
                .set_json($body)
                .to_request();
            let resp = test::call_service(&$app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            body["data"]["id"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn test_assignment_flow_over_http() {
        let app = test_app!();

        let teacher = created_id!(
            app,
            "/api/v1/teachers",
            json!({
                "lastName": "Santos",
                "firstName": "Maria",
                "email": "maria@school.edu",
                "username": "msantos",
                "role": "teacher"
            })
        );
        let subject = created_id!(
            app,
            "/api/v1/subjects",
            json!({"name": "Math", "track": "Core", "semester": "1st"})
        );
        let section = created_id!(
            app,
            "/api/v1/sections",
            json!({"name": "Grade 10 - A", "strand": "STEM", "yearLevel": 10})
        );

        let uri = format!("/api/v1/subjects/{subject}/teachers/{teacher}");
        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let resp = test::call_service(&app, test::TestRequest::post().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 2001);

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/sections/{section}/subjects"))
            .set_json(json!({"subjectId": subject, "teacherId": teacher}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["sectionName"], "Grade 10 - A");

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/teachers/{teacher}/subjects/{subject}"))
            .set_json(json!({"WW1_First": 9.5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["WW1_First"], 9.5);

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/teachers/{teacher}/subjects/{subject}"))
            .set_json(json!({"Quiz": 1}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/v1/system/consistency")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["consistent"], true);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/sections/{section}/subjects/{subject}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"], true);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/sections/{section}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["subjectIds"], json!([]));
    }

    #[actix_web::test]
    async fn test_error_status_mapping() {
        let app = test_app!();

        let req = test::TestRequest::get()
            .uri("/api/v1/teachers/ghost")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/v1/sections/sec1/subjects")
            .set_json(json!({"subjectId": "", "teacherId": "t1"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/v1/scores").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/v1/system/health")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["storeBackend"], "memory");
    }
}
