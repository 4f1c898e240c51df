//! Patient and user administration.

mod common;

use axum::http::{Method, StatusCode};
use clinic_core::rbac::Role;
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn patient_lifecycle() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let doctor = app.token_for(Role::Doctor).await;

    let (status, patient) = app
        .post(
            "/patients",
            &doctor,
            json!({"name": "John Doe", "patientCode": "PX1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = patient["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .post(
            "/patients",
            &doctor,
            json!({"name": "Jane Doe", "patientCode": "PX1"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, updated) = app
        .patch(
            &format!("/patients/{id}"),
            &doctor,
            json!({"name": "John Q. Doe"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["patientCode"], "PX1");

    // Doctors may not delete patients.
    let (status, _) = app.delete(&format!("/patients/{id}"), &doctor).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete(&format!("/patients/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/patients/{id}"), &doctor).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, list) = app.get("/patients", &doctor).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn blank_patient_fields_are_rejected() {
    let app = TestApp::new();
    let doctor = app.token_for(Role::Doctor).await;
    let (status, _) = app
        .post(
            "/patients",
            &doctor,
            json!({"name": "  ", "patientCode": "P1"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_manages_users() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;

    let (status, created) = app
        .post(
            "/users",
            &admin,
            json!({
                "name": "Sarah",
                "email": "sarah@clinic.test",
                "password": "nurse123",
                "role": "NURSE"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created.get("token").is_none());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = app
        .patch(
            &format!("/users/{id}"),
            &admin,
            json!({"email": "Sarah.K@Clinic.test", "password": "newpass1"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "sarah.k@clinic.test");

    let (status, _) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "sarah.k@clinic.test", "password": "newpass1"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Taking the admin's email is a conflict.
    let (status, _) = app
        .patch(
            &format!("/users/{id}"),
            &admin,
            json!({"email": "admin@clinic.test"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.delete(&format!("/users/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);

    // Deleted accounts cannot log in and their email stays taken.
    let (status, _) = app
        .send(
            Method::POST,
            "/auth/login",
            None,
            Some(json!({"email": "sarah.k@clinic.test", "password": "newpass1"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .send(
            Method::POST,
            "/auth/register",
            None,
            Some(json!({"name": "Sarah", "email": "sarah.k@clinic.test", "password": "123456"})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let id = uuid::Uuid::now_v7();
    for uri in [
        format!("/users/{id}"),
        format!("/patients/{id}"),
        format!("/treatments/{id}"),
        format!("/medications/{id}"),
        format!("/treatments/patient/{id}"),
    ] {
        let (status, body) = app.get(&uri, &admin).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["error"], "not_found");
    }
}
