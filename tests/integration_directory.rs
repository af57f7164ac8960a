mod common;

use axum::http::StatusCode;
use common::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn test_provisioned_usernames_get_suffixes() {
    let app = setup_test_app().await;
    let director = app.director_token().await;

    let mut usernames = Vec::new();
    for email in ["joao@escola.com", "joao@outra.com", "Joao@terceira.com"] {
        let (_, _, username) = app.create_teacher(&director, "João Silva", email, &[]).await;
        usernames.push(username);
    }

    assert_eq!(usernames, vec!["joao", "joao1", "joao2"]);
}

#[tokio::test]
async fn test_class_defaults_to_current_school_year() {
    let app = setup_test_app().await;
    let director = app.director_token().await;

    let (status, _) = app
        .put("/api/settings", &director, json!({ "current_school_year": 2024 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, class) = app
        .post(
            "/api/classes",
            &director,
            json!({ "name": "1A", "shift": "Manhã", "room": "Sala 1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(class["school_year"], 2024);
}

#[tokio::test]
async fn test_teachers_are_rejected_from_director_routes() {
    let app = setup_test_app().await;
    let director = app.director_token().await;
    let (_, teacher, _) = app
        .create_teacher(&director, "Maria Souza", "maria@escola.com", &[])
        .await;

    let (status, body) = app
        .post("/api/disciplines", &teacher, json!({ "name": "Química" }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].as_str().unwrap().contains("director"));

    for uri in ["/api/finance/summary", "/api/staff", "/api/teachers"] {
        let (status, _) = app.get(uri, &teacher).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }

    let (status, _) = app.get("/api/disciplines", &teacher).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_students_only_see_their_own_record() {
    let app = setup_test_app().await;
    let director = app.director_token().await;
    let (ana, ana_token) = app
        .create_student(&director, "Ana Clara", "ana@escola.com", &[])
        .await;
    let (bruno, _) = app
        .create_student(&director, "Bruno Lima", "bruno@escola.com", &[])
        .await;

    let (status, body) = app.get(&format!("/api/students/{ana}"), &ana_token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana Clara");

    let (status, _) = app.get(&format!("/api/students/{bruno}"), &ana_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/students", &ana_token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_invalid_student_name_is_unprocessable() {
    let app = setup_test_app().await;
    let director = app.director_token().await;

    let (status, body) = app
        .post(
            "/api/students",
            &director,
            json!({
                "name": "Ana 123",
                "birth_date": "2010-03-09",
                "email": "ana@escola.com",
                "phone": "11988880000",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["name"].is_array());

    let (_, list) = app.get("/api/students", &director).await;
    assert_eq!(list["meta"]["total"], 0);
}

#[tokio::test]
async fn test_guardian_delete() {
    let app = setup_test_app().await;
    let director = app.director_token().await;
    let (ana, _) = app
        .create_student(&director, "Ana Clara", "ana@escola.com", &[])
        .await;

    let guardian = app
        .create(
            "/api/guardians",
            &director,
            json!({
                "student_id": ana,
                "name": "Carla Clara",
                "birth_date": "1980-01-15",
                "email": "carla@escola.com",
                "phone": "11977770000",
            }),
        )
        .await;
    let uri = format!("/api/guardians/{guardian}");

    let (status, _) = app.request("DELETE", &uri, Some(&director), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&uri, &director).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.request("DELETE", &uri, Some(&director), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ledger_settle_and_summary() {
    let app = setup_test_app().await;
    let director = app.director_token().await;

    let payable = app
        .create(
            "/api/finance/payables",
            &director,
            json!({
                "description": "Conta de luz",
                "category": "electricity",
                "amount_cents": 15000,
                "due_date": "2024-03-10",
            }),
        )
        .await;

    let settle_uri = format!("/api/finance/payables/{payable}/settle");
    let (status, body) = app
        .post(&settle_uri, &director, json!({ "date": "2024-03-09" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["paid"], true);

    let (status, _) = app.post(&settle_uri, &director, json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, summary) = app.get("/api/finance/summary", &director).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["payables_paid_cents"], 15000);
    assert_eq!(summary["balance_cents"], -15000);
}
