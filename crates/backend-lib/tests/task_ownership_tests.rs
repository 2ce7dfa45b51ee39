//! Task CRUD through the router, with two accounts sharing one store.
mod common;

use axum::http::{Method, StatusCode};
use common::{create_task, send, setup_app, signup};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_task_crud_for_owner() {
    let app = setup_app();
    let token = signup(&app, "a@x.com").await;

    let task = create_task(&app, &token, "  buy milk  ").await;
    assert_eq!(task["title"], "buy milk");
    assert_eq!(task["description"], "");
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, fetched) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, task);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["title"], "buy milk");

    let (status, body) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_is_newest_first_and_per_owner() {
    let app = setup_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;

    create_task(&app, &alice, "first").await;
    create_task(&app, &alice, "second").await;
    create_task(&app, &bob, "bob's").await;

    let (status, body) = send(&app, Method::GET, "/api/tasks", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["second", "first"]);
}

#[tokio::test]
async fn test_foreign_task_is_indistinguishable_from_missing() {
    let app = setup_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;

    let task = create_task(&app, &alice, "private").await;
    let foreign_uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());
    let missing_uri = format!("/api/tasks/{}", Uuid::new_v4());

    let (foreign_status, foreign_body) =
        send(&app, Method::GET, &foreign_uri, Some(&bob), None).await;
    let (missing_status, missing_body) =
        send(&app, Method::GET, &missing_uri, Some(&bob), None).await;
    assert_eq!(foreign_status, StatusCode::NOT_FOUND);
    assert_eq!(missing_status, StatusCode::NOT_FOUND);
    assert_eq!(foreign_body, missing_body);

    let (status, _) = send(
        &app,
        Method::PUT,
        &foreign_uri,
        Some(&bob),
        Some(json!({ "title": "hijacked", "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &foreign_uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's task is untouched
    let (status, body) = send(&app, Method::GET, &foreign_uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, task);
}

#[tokio::test]
async fn test_client_supplied_owner_is_ignored() {
    let app = setup_app();
    let alice = signup(&app, "alice@x.com").await;
    let bob = signup(&app, "bob@x.com").await;

    let (_, bob_list) = send(&app, Method::GET, "/api/tasks", Some(&bob), None).await;
    assert_eq!(bob_list, json!([]));

    let (status, task) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&alice),
        Some(json!({ "title": "mine", "user_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, alice_list) = send(&app, Method::GET, "/api/tasks", Some(&alice), None).await;
    assert_eq!(alice_list, json!([task]));
}

#[tokio::test]
async fn test_invalid_task_input_is_bad_request() {
    let app = setup_app();
    let token = signup(&app, "a@x.com").await;
    let task = create_task(&app, &token, "valid").await;
    let uri = format!("/api/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/tasks",
        Some(&token),
        Some(json!({ "title": "x".repeat(256) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "status": "archived" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unparseable_task_id_is_not_found() {
    let app = setup_app();
    let token = signup(&app, "a@x.com").await;

    let (status, _) = send(&app, Method::GET, "/api/tasks/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
