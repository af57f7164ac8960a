//! SisProf observability.
//!
//! Structured logging via `tracing` and Prometheus metrics via `metrics`.
//! The whole layer is compiled in by the `observability` feature and can be
//! switched off at runtime with `OBSERVABILITY_ENABLED=false`, in which case
//! only console logging is installed.
//!
//! # Examples
//!
//! ```no_run
//! use sisprof_observability::init_tracing;
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//! }
//! ```

pub mod basic_logging;

#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_app, metrics_middleware, track_access_denied,
    track_account_provisioned, track_announcement_created, track_attendance_recorded,
    track_grades_recorded, track_jwt_issued, track_login_failure, track_login_success,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{Router, extract::Request, middleware::Next, response::Response};

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    /// Console logging only.
    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    #[derive(Debug, Clone)]
    pub struct PrometheusHandle;

    pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
        Ok(None)
    }

    pub fn metrics_app(_handle: PrometheusHandle) -> Router {
        Router::new()
    }

    pub fn track_login_success(_role: &str) {}
    pub fn track_login_failure(_reason: &str) {}
    pub fn track_jwt_issued() {}
    pub fn track_account_provisioned(_role: &str) {}
    pub fn track_attendance_recorded(_entries: usize) {}
    pub fn track_grades_recorded(_entries: usize) {}
    pub fn track_announcement_created(_kind: &str) {}
    pub fn track_access_denied(_operation: &str) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

#[cfg(all(test, not(feature = "observability")))]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, middleware, routing::get};
    use tower::ServiceExt;

    #[test]
    fn test_stubs_are_disabled() {
        assert!(!is_observability_enabled());
        assert!(init_metrics().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stub_middleware_passes_through() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(logging_middleware))
            .layer(middleware::from_fn(metrics_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}
