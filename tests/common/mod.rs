//! Shared harness: the full router over an in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sisprof::router::init_router;
use sisprof::state::AppState;
use sisprof_config::{AcademicConfig, CorsConfig, JwtConfig, ProvisioningConfig};
use sisprof_core::{Role, hash_password_with_cost};
use sisprof_db::{IdentityStore, MemoryStore};
use sisprof_models::ids::AccountId;
use sisprof_models::{Email, NewAccount};
use tower::ServiceExt;

pub const DIRECTOR_USERNAME: &str = "diretora";
pub const DIRECTOR_PASSWORD: &str = "segredo123";
pub const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub router: Router,
}

pub async fn setup_test_app() -> TestApp {
    let store = MemoryStore::new();
    store
        .insert_account(&NewAccount {
            id: AccountId::new(),
            username: DIRECTOR_USERNAME.to_string(),
            email: Email::new_unchecked("diretora@escola.com"),
            password_hash: hash_password_with_cost(DIRECTOR_PASSWORD, TEST_BCRYPT_COST).unwrap(),
            roles: vec![Role::Director],
        })
        .await
        .unwrap();

    let state = AppState {
        store: Arc::new(store),
        jwt_config: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig {
            allowed_origins: vec![],
        },
        provisioning_config: ProvisioningConfig {
            password_length: 10,
            bcrypt_cost: TEST_BCRYPT_COST,
        },
        academic_config: AcademicConfig::default(),
    };

    TestApp {
        router: init_router(state),
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.request("GET", uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(token), Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn director_token(&self) -> String {
        self.login(DIRECTOR_USERNAME, DIRECTOR_PASSWORD).await
    }

    /// Creates a record and returns its id.
    pub async fn create(&self, uri: &str, token: &str, body: Value) -> String {
        let (status, body) = self.post(uri, token, body).await;
        assert_eq!(status, StatusCode::CREATED, "create {uri} failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates a teacher and logs in with the provisioned credentials.
    /// Returns (teacher id, token, username).
    pub async fn create_teacher(
        &self,
        director: &str,
        name: &str,
        email: &str,
        class_ids: &[&str],
    ) -> (String, String, String) {
        let (status, body) = self
            .post(
                "/api/teachers",
                director,
                json!({
                    "name": name,
                    "birth_date": "1985-05-20",
                    "email": email,
                    "phone": "11999990000",
                    "class_ids": class_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create teacher failed: {body}");

        let id = body["teacher"]["id"].as_str().unwrap().to_string();
        let username = body["credentials"]["username"].as_str().unwrap().to_string();
        let password = body["credentials"]["password"].as_str().unwrap().to_string();
        let token = self.login(&username, &password).await;
        (id, token, username)
    }

    /// Creates a student enrolled in `class_ids`. Returns (student id, token).
    pub async fn create_student(
        &self,
        director: &str,
        name: &str,
        email: &str,
        class_ids: &[&str],
    ) -> (String, String) {
        let (status, body) = self
            .post(
                "/api/students",
                director,
                json!({
                    "name": name,
                    "birth_date": "2010-03-09",
                    "email": email,
                    "phone": "11988880000",
                    "class_ids": class_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create student failed: {body}");

        let id = body["student"]["id"].as_str().unwrap().to_string();
        let username = body["credentials"]["username"].as_str().unwrap().to_string();
        let password = body["credentials"]["password"].as_str().unwrap().to_string();
        let token = self.login(&username, &password).await;
        (id, token)
    }
}
