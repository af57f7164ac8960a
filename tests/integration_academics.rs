mod common;

use axum::http::StatusCode;
use common::{TestApp, setup_test_app};
use serde_json::{Value, json};

struct School {
    director: String,
    math: String,
    class_1a: String,
    maria_token: String,
    pedro_token: String,
    ana: String,
    ana_token: String,
    bruno_token: String,
}

/// 1A (2024) taught by Maria with Ana enrolled; 2B taught by Pedro with Bruno.
async fn school(app: &TestApp) -> School {
    let director = app.director_token().await;
    let math = app
        .create("/api/disciplines", &director, json!({ "name": "Matemática" }))
        .await;

    let mut class_ids = Vec::new();
    for name in ["1A", "2B"] {
        let id = app
            .create(
                "/api/classes",
                &director,
                json!({
                    "name": name,
                    "shift": "Manhã",
                    "room": "Sala 1",
                    "school_year": 2024,
                    "discipline_ids": [math],
                }),
            )
            .await;
        class_ids.push(id);
    }
    let (class_1a, class_2b) = (class_ids[0].clone(), class_ids[1].clone());

    let (_, maria_token, _) = app
        .create_teacher(&director, "Maria Souza", "maria@escola.com", &[class_1a.as_str()])
        .await;
    let (_, pedro_token, _) = app
        .create_teacher(&director, "Pedro Alves", "pedro@escola.com", &[class_2b.as_str()])
        .await;
    let (ana, ana_token) = app
        .create_student(&director, "Ana Clara", "ana@escola.com", &[class_1a.as_str()])
        .await;
    let (_, bruno_token) = app
        .create_student(&director, "Bruno Lima", "bruno@escola.com", &[class_2b.as_str()])
        .await;

    School {
        director,
        math,
        class_1a,
        maria_token,
        pedro_token,
        ana,
        ana_token,
        bruno_token,
    }
}

async fn maria_lesson(app: &TestApp, school: &School) -> String {
    app.create(
        "/api/lessons",
        &school.maria_token,
        json!({
            "class_id": school.class_1a,
            "discipline_id": school.math,
            "date": "2024-03-04",
            "content": "Frações",
        }),
    )
    .await
}

async fn maria_assessment(app: &TestApp, school: &School) -> String {
    let prova = app
        .create(
            "/api/assessment-types",
            &school.director,
            json!({ "name": "Prova" }),
        )
        .await;
    app.create(
        "/api/assessments",
        &school.maria_token,
        json!({
            "class_id": school.class_1a,
            "discipline_id": school.math,
            "assessment_type_id": prova,
            "name": "P1",
            "date": "2024-03-20",
            "max_value": 10.0,
        }),
    )
    .await
}

fn grades(student_id: &str, value: f64) -> Value {
    json!({ "entries": [{ "student_id": student_id, "value": value }] })
}

#[tokio::test]
async fn test_present_in_every_lesson_is_full_attendance() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    let lesson = maria_lesson(&app, &school).await;

    let (status, _) = app
        .put(
            &format!("/api/lessons/{lesson}/attendance"),
            &school.maria_token,
            json!({ "entries": [{ "student_id": school.ana, "status": "present" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, report) = app
        .get(
            &format!("/api/reports/students/{}", school.ana),
            &school.ana_token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["attendance_percentage"], 100.0);
    assert_eq!(report["attendance"]["present"], 1);
}

#[tokio::test]
async fn test_second_grade_replaces_the_first() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    let assessment = maria_assessment(&app, &school).await;
    let uri = format!("/api/assessments/{assessment}/grades");

    for value in [7.5, 9.0] {
        let (status, _) = app
            .put(&uri, &school.maria_token, grades(&school.ana, value))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, sheet) = app.get(&uri, &school.maria_token).await;
    assert_eq!(status, StatusCode::OK);
    let rows = sheet["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["value"], 9.0);

    let (_, report) = app
        .get(&format!("/api/reports/classes/{}", school.class_1a), &school.director)
        .await;
    assert_eq!(report["average_grade"], 9.0);
}

#[tokio::test]
async fn test_grade_above_maximum_is_rejected() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    let assessment = maria_assessment(&app, &school).await;

    let (status, body) = app
        .put(
            &format!("/api/assessments/{assessment}/grades"),
            &school.maria_token,
            grades(&school.ana, 10.5),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["entries"].is_array());
}

#[tokio::test]
async fn test_non_owner_cannot_record() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    let lesson = maria_lesson(&app, &school).await;
    let uri = format!("/api/lessons/{lesson}/attendance");

    let (status, _) = app
        .put(
            &uri,
            &school.pedro_token,
            json!({ "entries": [{ "student_id": school.ana, "status": "absent" }] }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, sheet) = app.get(&uri, &school.maria_token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(sheet["rows"][0]["status"].is_null());
}

#[tokio::test]
async fn test_duplicate_lesson_is_conflict() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    maria_lesson(&app, &school).await;

    let (status, _) = app
        .post(
            "/api/lessons",
            &school.maria_token,
            json!({
                "class_id": school.class_1a,
                "discipline_id": school.math,
                "date": "2024-03-04",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_moving_lesson_onto_taken_date_is_conflict() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    maria_lesson(&app, &school).await;
    let second = app
        .create(
            "/api/lessons",
            &school.maria_token,
            json!({
                "class_id": school.class_1a,
                "discipline_id": school.math,
                "date": "2024-03-05",
            }),
        )
        .await;

    let (status, _) = app
        .put(
            &format!("/api/lessons/{second}"),
            &school.maria_token,
            json!({ "date": "2024-03-04" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, lesson) = app
        .get(&format!("/api/lessons/{second}"), &school.maria_token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lesson["date"], "2024-03-05");
}

#[tokio::test]
async fn test_maximum_cannot_drop_below_recorded_grade() {
    let app = setup_test_app().await;
    let school = school(&app).await;
    let assessment = maria_assessment(&app, &school).await;

    let (status, _) = app
        .put(
            &format!("/api/assessments/{assessment}/grades"),
            &school.maria_token,
            grades(&school.ana, 9.0),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let uri = format!("/api/assessments/{assessment}");
    let (status, body) = app
        .put(&uri, &school.maria_token, json!({ "max_value": 5.0 }))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["fields"]["max_value"].is_array());

    let (_, stored) = app.get(&uri, &school.maria_token).await;
    assert_eq!(stored["max_value"], 10.0);
}

#[tokio::test]
async fn test_class_announcement_reaches_only_members() {
    let app = setup_test_app().await;
    let school = school(&app).await;

    let announcement = app
        .create(
            "/api/announcements",
            &school.maria_token,
            json!({
                "title": "Prova na sexta",
                "message": "Estudem frações",
                "kind": "event",
                "class_ids": [school.class_1a],
            }),
        )
        .await;

    let (_, for_ana) = app.get("/api/announcements", &school.ana_token).await;
    assert_eq!(for_ana.as_array().unwrap().len(), 1);

    let (_, for_bruno) = app.get("/api/announcements", &school.bruno_token).await;
    assert!(for_bruno.as_array().unwrap().is_empty());

    let (status, _) = app
        .get(
            &format!("/api/announcements/{announcement}"),
            &school.bruno_token,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, for_pedro) = app.get("/api/announcements", &school.pedro_token).await;
    assert!(for_pedro.as_array().unwrap().is_empty());
}
