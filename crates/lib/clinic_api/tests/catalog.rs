//! Medication and treatment option catalogs.

mod common;

use axum::http::StatusCode;
use clinic_core::rbac::Role;
use common::TestApp;
use serde_json::{Value, json};

fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn listings_order_by_name_and_hide_deleted() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;

    let mut ids = Vec::new();
    for (name, slug) in [
        ("Paracetamol", "paracetamol"),
        ("Aspirin", "aspirin"),
        ("Ibuprofen", "ibuprofen"),
    ] {
        let (_, body) = app
            .post("/medications", &admin, json!({"name": name, "slug": slug}))
            .await;
        ids.push(body["id"].as_str().unwrap().to_string());
    }
    app.delete(&format!("/medications/{}", ids[1]), &admin)
        .await;

    let (_, active) = app.get("/medications", &admin).await;
    assert_eq!(names(&active), ["Ibuprofen", "Paracetamol"]);
    let (_, also_active) = app.get("/medications/active", &admin).await;
    assert_eq!(active, also_active);

    let (_, all) = app
        .get("/medications/all?includeDeleted=true", &admin)
        .await;
    assert_eq!(names(&all), ["Ibuprofen", "Paracetamol", "Aspirin"]);

    let (_, without_flag) = app.get("/medications/all", &admin).await;
    assert_eq!(names(&without_flag), ["Ibuprofen", "Paracetamol"]);

    // Deleted entries still resolve by id.
    let (status, aspirin) = app.get(&format!("/medications/{}", ids[1]), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert!(aspirin["deletedAt"].is_string());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    for (name, slug) in [
        ("Metformin", "metformin"),
        ("Metronidazole", "metronidazole"),
        ("Aspirin", "aspirin"),
    ] {
        app.post("/medications", &admin, json!({"name": name, "slug": slug}))
            .await;
    }
    let staff = app.token_for(Role::Staff).await;

    let (status, found) = app.get("/medications/search?query=METR", &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&found), ["Metronidazole"]);

    let (_, all) = app.get("/medications/search", &staff).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn duplicate_active_slug_conflicts_until_deleted() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;

    let (status, first) = app
        .post(
            "/treatments/options",
            &admin,
            json!({"name": "MRI", "slug": "mri"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(
            "/treatments/options",
            &admin,
            json!({"name": "MRI scan", "slug": "mri"}),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let id = first["id"].as_str().unwrap();
    let (status, _) = app
        .delete(&format!("/treatments/options/{id}"), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .delete(&format!("/treatments/options/{id}"), &admin)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post(
            "/treatments/options",
            &admin,
            json!({"name": "MRI scan", "slug": "mri"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn update_renames_active_entries_only() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let (_, created) = app
        .post(
            "/medications",
            &admin,
            json!({"name": "Amoxicilin", "slug": "amoxicillin"}),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = app
        .patch(
            &format!("/medications/{id}"),
            &admin,
            json!({"name": "Amoxicillin"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Amoxicillin");
    assert_eq!(updated["slug"], "amoxicillin");

    app.delete(&format!("/medications/{id}"), &admin).await;
    let (status, _) = app
        .patch(
            &format!("/medications/{id}"),
            &admin,
            json!({"name": "Again"}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_skips_deleted_entries() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let (_, created) = app
        .post(
            "/medications",
            &admin,
            json!({"name": "Ibuprofen", "slug": "ibuprofen"}),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let (_, found) = app.get("/medications/search?query=ibu", &admin).await;
    assert_eq!(names(&found), ["Ibuprofen"]);

    let (status, _) = app.delete(&format!("/medications/{id}"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    let (status, found) = app.get("/medications/search?query=ibu", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([]));
}

#[tokio::test]
async fn medications_are_also_served_under_treatments() {
    let app = TestApp::new();
    let admin = app.token_for(Role::Admin).await;
    let staff = app.token_for(Role::Staff).await;

    let (status, created) = app
        .post(
            "/treatments/medications",
            &admin,
            json!({"name": "Aspirin", "slug": "aspirin"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, list) = app.get("/treatments/medications", &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&list), ["Aspirin"]);

    let (status, _) = app
        .post(
            "/treatments/medications",
            &staff,
            json!({"name": "Ibuprofen", "slug": "ibuprofen"}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .patch(
            &format!("/treatments/medications/{id}"),
            &admin,
            json!({"name": "Aspirin 500"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Aspirin 500");
    let (_, same) = app.get(&format!("/medications/{id}"), &admin).await;
    assert_eq!(same["name"], "Aspirin 500");

    let (status, _) = app
        .delete(&format!("/treatments/medications/{id}"), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, list) = app.get("/treatments/medications", &staff).await;
    assert_eq!(list, json!([]));
}
