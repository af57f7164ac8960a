use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use sisprof_observability::{logging_middleware, metrics_middleware};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use crate::docs::ApiDoc;
use crate::middleware::role::require_director;
use crate::modules::announcements::init_announcements_router;
use crate::modules::assessment_types::init_assessment_types_router;
use crate::modules::assessments::init_assessments_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classes::init_classes_router;
use crate::modules::disciplines::init_disciplines_router;
use crate::modules::finance::init_finance_router;
use crate::modules::guardians::init_guardians_router;
use crate::modules::lessons::init_lessons_router;
use crate::modules::reports::init_reports_router;
use crate::modules::settings::init_settings_router;
use crate::modules::staff::init_staff_router;
use crate::modules::students::init_students_router;
use crate::modules::teachers::init_teachers_router;
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/settings", init_settings_router())
                .nest("/disciplines", init_disciplines_router())
                .nest("/classes", init_classes_router())
                .nest("/teachers", init_teachers_router())
                .nest("/students", init_students_router())
                .nest("/staff", init_staff_router())
                .nest("/guardians", init_guardians_router())
                .nest("/assessment-types", init_assessment_types_router())
                .nest("/lessons", init_lessons_router())
                .nest("/assessments", init_assessments_router())
                .nest("/announcements", init_announcements_router())
                .nest(
                    "/finance",
                    init_finance_router().route_layer(middleware::from_fn_with_state(
                        state.clone(),
                        require_director,
                    )),
                )
                .nest("/reports", init_reports_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
