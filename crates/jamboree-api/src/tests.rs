use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Method, Request, StatusCode},
};
use jamboree_core::PartyService;
use jamboree_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  api_router(Arc::new(PartyService::new(store)))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  admin: Option<&str>,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  if let Some(code) = admin {
    req = req.header("X-Admin-Code", code);
  }
  let req = match body {
    Some(body) => req
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => req.body(Body::empty()).unwrap(),
  };

  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, value)
}

/// Create a party and return `(name, admin_code)`.
async fn create_party(app: &Router) -> (String, String) {
  let (status, body) =
    send(app, Method::POST, "/parties", None, Some(json!({ "username": "ana" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  (
    body["name"].as_str().unwrap().to_owned(),
    body["admin_code"].as_str().unwrap().to_owned(),
  )
}

// ─── Parties ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn created_party_is_visible_without_its_secret() {
  let app = app().await;
  let (name, code) = create_party(&app).await;
  assert_eq!(code.len(), 32);

  let (status, party) = send(&app, Method::GET, &format!("/parties/{name}"), None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(party["creator"], "ana");
  assert!(party.get("admin_secret").is_none());

  let (status, by_code) =
    send(&app, Method::GET, &format!("/party?admin_code={code}"), None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(by_code["name"], name.as_str());
}

#[tokio::test]
async fn lookup_without_selector_is_bad_request() {
  let app = app().await;
  let (status, body) = send(&app, Method::GET, "/party", None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _) = send(&app, Method::GET, "/parties/nobody-at-all", None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
  let app = app().await;
  let (status, _) = send(&app, Method::POST, "/parties", None, Some(json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_require_admin_code() {
  let app = app().await;
  let (name, code) = create_party(&app).await;
  let uri = format!("/parties/{name}/settings");
  let patch = json!({ "date_voting_enabled": true });

  let (status, _) = send(&app, Method::PATCH, &uri, None, Some(patch.clone())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  let (status, _) = send(&app, Method::PATCH, &uri, Some("x"), Some(patch.clone())).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, party) = send(&app, Method::PATCH, &uri, Some(&code), Some(patch)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(party["settings"]["dates"]["voting_enabled"], true);
  assert_eq!(party["settings"]["dates"]["options_enabled"], false);
}

#[tokio::test]
async fn unknown_settings_key_is_rejected_and_changes_nothing() {
  let app = app().await;
  let (name, code) = create_party(&app).await;
  let uri = format!("/parties/{name}/settings");

  let (status, body) = send(
    &app,
    Method::PATCH,
    &uri,
    Some(&code),
    Some(json!({ "dateVotingEnabled": true })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("dateVotingEnabled"));

  let (_, party) = send(&app, Method::GET, &format!("/parties/{name}"), None, None).await;
  assert_eq!(party["settings"]["dates"]["voting_enabled"], false);
}

#[tokio::test]
async fn misspelled_supply_field_is_rejected() {
  let app = app().await;
  let (name, _) = create_party(&app).await;

  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/supplies"),
    None,
    Some(json!({ "name": "Ice", "quantitiy": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, list) = send(&app, Method::GET, &format!("/parties/{name}/supplies"), None, None).await;
  assert!(list.as_array().unwrap().is_empty());
}

// ─── Options ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn date_options_are_gated_until_voting_opens() {
  let app = app().await;
  let (name, code) = create_party(&app).await;
  let uri = format!("/parties/{name}/dates");

  let (status, first) =
    send(&app, Method::POST, &uri, Some(&code), Some(json!({ "date": "1700000000" }))).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(first["payload"]["kind"], "date");

  let (status, _) =
    send(&app, Method::POST, &uri, Some(&code), Some(json!({ "date": "1700086400" }))).await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, list) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn option_bodies_are_validated() {
  let app = app().await;
  let (name, code) = create_party(&app).await;

  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/dates"),
    Some(&code),
    Some(json!({ "date": "next tuesday" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/locations"),
    Some(&code),
    Some(json!({ "link": "https://x.test/p" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _) = send(&app, Method::GET, &format!("/parties/{name}/venues"), None, None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn option_edit_and_delete() {
  let app = app().await;
  let (name, code) = create_party(&app).await;

  let (_, opt) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/locations"),
    Some(&code),
    Some(json!({ "location": "Park" })),
  )
  .await;
  let uri = format!("/locations/{}", opt["id"]);

  let (status, edited) =
    send(&app, Method::PATCH, &uri, None, Some(json!({ "location": "Roof" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(edited["payload"]["value"], "Roof");

  // Same id, wrong collection.
  let (status, _) = send(&app, Method::GET, &format!("/dates/{}", opt["id"]), None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, Method::GET, &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Votes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn vote_toggle_creates_then_removes() {
  let app = app().await;
  let (name, code) = create_party(&app).await;

  let (_, opt) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/playlists"),
    Some(&code),
    Some(json!({ "link": "https://x.test/p" })),
  )
  .await;
  let votes = format!("/playlists/{}/votes", opt["id"]);
  let ana = json!({ "username": "ana" });

  let (status, vote) = send(&app, Method::POST, &votes, None, Some(ana.clone())).await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(vote["username"], "ana");

  let (_, list) = send(&app, Method::GET, &votes, None, None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);

  let (status, vote) = send(&app, Method::POST, &votes, None, Some(ana)).await;
  assert_eq!(status, StatusCode::OK);
  assert!(vote.is_null());

  let (_, list) = send(&app, Method::GET, &votes, None, None).await;
  assert!(list.as_array().unwrap().is_empty());
}

// ─── Supplies ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn supply_lifecycle() {
  let app = app().await;
  let (name, _) = create_party(&app).await;

  let (status, supply) = send(
    &app,
    Method::POST,
    &format!("/parties/{name}/supplies"),
    None,
    Some(json!({ "name": "Ice" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(supply["quantity"], 1);
  assert_eq!(supply["assignee"], "");
  let uri = format!("/supplies/{}", supply["id"]);

  let (status, _) = send(&app, Method::PATCH, &uri, None, Some(json!({ "quantity": 0 }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, edited) =
    send(&app, Method::PATCH, &uri, None, Some(json!({ "quantity": 4, "is_urgent": true }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(edited["quantity"], 4);
  assert_eq!(edited["is_urgent"], true);

  let (status, assigned) = send(
    &app,
    Method::POST,
    &format!("{uri}/assign"),
    None,
    Some(json!({ "username": "ben" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(assigned["assignee"], "ben");

  let (_, list) = send(&app, Method::GET, &format!("/parties/{name}/supplies"), None, None).await;
  assert_eq!(list.as_array().unwrap().len(), 1);

  let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn supplies_of_missing_party_are_not_found() {
  let app = app().await;
  let (status, _) = send(
    &app,
    Method::POST,
    "/parties/nobody-at-all/supplies",
    None,
    Some(json!({ "name": "Ice" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
