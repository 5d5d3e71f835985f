//! Create, read, update, and delete through the HTTP API.

use crate::http_api::helpers::{TestApp, app};
use axum::http::{Method, StatusCode};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_get_delete_then_not_found(app: TestApp) -> eyre::Result<()> {
    let created = app
        .send(Method::POST, "/tasks/", Some(json!({ "title": "t1" })))
        .await?;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.data()["id"], 1);

    let fetched = app.send(Method::GET, "/tasks/1/", None).await?;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.data(), created.data());

    let deleted = app.send(Method::DELETE, "/tasks/1/", None).await?;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert!(deleted.body.is_null());

    let gone = app.send(Method::GET, "/tasks/1/", None).await?;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.error(), "Task with task_id:1 not found");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_has_every_field(app: TestApp) -> eyre::Result<()> {
    let created = app
        .send(
            Method::POST,
            "/tasks",
            Some(json!({ "title": "Write report", "description": "Q3 numbers" })),
        )
        .await?;

    let data = created.data();
    let mut keys: Vec<_> = data
        .as_object()
        .map(|object| object.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "created_at",
            "deleted",
            "description",
            "id",
            "title",
            "updated_at"
        ]
    );
    assert_eq!(data["title"], "Write report");
    assert_eq!(data["description"], "Q3 numbers");
    assert_eq!(data["deleted"], false);
    assert_eq!(data["created_at"], data["updated_at"]);
    Ok(())
}

#[rstest]
#[case("/tasks/1")]
#[case("/tasks/1/")]
#[tokio::test(flavor = "multi_thread")]
async fn member_routes_accept_both_slash_forms(
    app: TestApp,
    #[case] uri: &str,
) -> eyre::Result<()> {
    app.create("slashes").await?;

    let response = app.send(Method::GET, uri, None).await?;

    assert_eq!(response.status, StatusCode::OK);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_changes_only_supplied_fields(app: TestApp) -> eyre::Result<()> {
    let id = app.create("Keep me").await?;
    let uri = format!("/tasks/{id}/");

    let updated = app
        .send(Method::PUT, &uri, Some(json!({ "description": "added" })))
        .await?;

    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.data()["title"], "Keep me");
    assert_eq!(updated.data()["description"], "added");

    let cleared = app
        .send(Method::PUT, &uri, Some(json!({ "description": null })))
        .await?;
    assert!(cleared.data()["description"].is_null());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_update_is_accepted(app: TestApp) -> eyre::Result<()> {
    let id = app.create("Untouched").await?;

    let response = app
        .send(Method::PUT, &format!("/tasks/{id}"), Some(json!({})))
        .await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["title"], "Untouched");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleted_task_rejects_update_and_delete(app: TestApp) -> eyre::Result<()> {
    let id = app.create("Doomed").await?;
    let uri = format!("/tasks/{id}/");
    app.send(Method::DELETE, &uri, None).await?;

    let update = app
        .send(Method::PUT, &uri, Some(json!({ "title": "Revived" })))
        .await?;
    let delete = app.send(Method::DELETE, &uri, None).await?;

    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.status, StatusCode::NOT_FOUND);
    assert_eq!(delete.error(), format!("Task with task_id:{id} not found").as_str());
    Ok(())
}

#[rstest]
#[case::word("abc")]
#[case::zero("0")]
#[case::negative("-4")]
#[tokio::test(flavor = "multi_thread")]
async fn unusable_identifiers_are_not_found(app: TestApp, #[case] raw: &str) -> eyre::Result<()> {
    let response = app.send(Method::GET, &format!("/tasks/{raw}/"), None).await?;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        response.error(),
        format!("Task with task_id:{raw} not found").as_str()
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn health_reports_ok(app: TestApp) -> eyre::Result<()> {
    let response = app.send(Method::GET, "/health", None).await?;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({ "status": "ok" }));
    Ok(())
}
