mod common;

use std::time::Duration;

use acciresque_lib::test_helpers::{sample_accident_json, AccidentBuilder};
use acciresque_lib::{
    create_accident, delete_accident, get_accident, list_accidents, update_accident, Error,
    HttpAccidentStore, StoreConfig,
};
use axum::http::{Method, StatusCode};
use common::{closed_address, FakeStore, Reply};
use serde_json::{json, Value};

#[tokio::test]
async fn list_sends_read_tags_to_root_collection() {
    let fake = FakeStore::json(json!({ "accidents": [sample_accident_json()] })).await;

    let accidents = list_accidents(&fake.client()).await.expect("list succeeds");
    assert_eq!(accidents.len(), 1);
    assert_eq!(accidents[0], AccidentBuilder::new().build());

    let request = fake.only_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/.json");
    assert_eq!(request.query.get("auth").map(String::as_str), Some("PUBLIC"));
    assert_eq!(
        request.query.get("query").map(String::as_str),
        Some("ListAccidents")
    );
}

#[tokio::test]
async fn keyed_list_fills_missing_id_from_key() {
    let mut unnamed = sample_accident_json();
    unnamed.as_object_mut().unwrap().remove("accidentId");
    let fake = FakeStore::json(json!({
        "accidents": { "k9": unnamed, "a1": sample_accident_json() }
    }))
    .await;

    let accidents = list_accidents(&fake.client()).await.unwrap();
    let ids: Vec<_> = accidents
        .iter()
        .map(|a| a.accident_id.as_deref())
        .collect();
    assert_eq!(ids, vec![Some("a1"), Some("k9")]);
}

#[tokio::test]
async fn list_without_accidents_member_is_empty() {
    let fake = FakeStore::json(Value::Null).await;
    assert!(list_accidents(&fake.client()).await.unwrap().is_empty());
}

#[tokio::test]
async fn list_with_missing_sub_record_is_malformed() {
    let mut broken = sample_accident_json();
    broken.as_object_mut().unwrap().remove("police");
    let fake = FakeStore::json(json!({ "accidents": [broken] })).await;

    let err = list_accidents(&fake.client()).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamMalformed { .. }), "{err:?}");
}

#[tokio::test]
async fn get_reads_per_id_document() {
    let fake = FakeStore::json(sample_accident_json()).await;

    let accident = get_accident(&fake.client(), "a1").await.unwrap();
    assert_eq!(serde_json::to_value(&accident).unwrap(), sample_accident_json());

    let request = fake.only_request();
    assert_eq!(request.path, "/a1.json");
    assert_eq!(
        request.query.get("query").map(String::as_str),
        Some("GetAccidentById")
    );
}

#[tokio::test]
async fn get_of_null_document_is_not_found() {
    let fake = FakeStore::json(Value::Null).await;
    let err = get_accident(&fake.client(), "missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound { ref id } if id == "missing"));
}

#[tokio::test]
async fn get_of_404_is_not_found() {
    let fake = FakeStore::start(Reply::Json(StatusCode::NOT_FOUND, json!({}))).await;
    let err = get_accident(&fake.client(), "missing").await.unwrap_err();
    assert_eq!(err.kind(), "not_found");
}

#[tokio::test]
async fn get_fills_id_from_path_when_document_lacks_it() {
    let mut doc = sample_accident_json();
    doc.as_object_mut().unwrap().remove("accidentId");
    let fake = FakeStore::json(doc).await;

    let accident = get_accident(&fake.client(), "k9").await.unwrap();
    assert_eq!(accident.accident_id.as_deref(), Some("k9"));
}

#[tokio::test]
async fn create_posts_write_body_and_returns_echoed_id() {
    let fake = FakeStore::json(json!({ "accidentId": "a1" })).await;

    let created = create_accident(&fake.client(), AccidentBuilder::new().build())
        .await
        .unwrap();
    assert_eq!(created.accident_id, "a1");

    let request = fake.only_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/.json");
    let body = request.body.expect("json body");
    assert_eq!(body["auth"], "ADMIN");
    assert_eq!(body["query"], "CreateAccident");
    assert_eq!(body["accident"], sample_accident_json());
}

#[tokio::test]
async fn create_accepts_push_key_reply() {
    let fake = FakeStore::json(json!({ "name": "-NpushKey" })).await;
    let created = create_accident(&fake.client(), AccidentBuilder::new().without_id().build())
        .await
        .unwrap();
    assert_eq!(created.accident_id, "-NpushKey");
}

#[tokio::test]
async fn update_puts_record_without_id() {
    let fake = FakeStore::json(json!({ "success": true })).await;

    let outcome = update_accident(&fake.client(), "a1", AccidentBuilder::new().build())
        .await
        .unwrap();
    assert_eq!(outcome.success, Some(true));

    let request = fake.only_request();
    assert_eq!(request.method, Method::PUT);
    assert_eq!(request.path, "/a1.json");
    let body = request.body.expect("json body");
    assert_eq!(body["query"], "UpdateAccident");
    assert!(body["accident"].get("accidentId").is_none());
    assert_eq!(body["accident"]["location"], "Main St");
}

#[tokio::test]
async fn delete_sends_write_tag_as_query() {
    let fake = FakeStore::json(json!({ "success": false })).await;

    let outcome = delete_accident(&fake.client(), "a1").await.unwrap();
    assert_eq!(outcome.success, Some(false));

    let request = fake.only_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/a1.json");
    assert_eq!(request.query.get("auth").map(String::as_str), Some("ADMIN"));
    assert_eq!(
        request.query.get("query").map(String::as_str),
        Some("DeleteAccident")
    );
    assert!(request.body.is_none());
}

#[tokio::test]
async fn error_status_is_upstream_status() {
    let fake = FakeStore::start(Reply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "boom" }),
    ))
    .await;
    match list_accidents(&fake.client()).await.unwrap_err() {
        Error::UpstreamStatus { status, .. } => assert_eq!(status, 500),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_reply_is_malformed() {
    let fake = FakeStore::start(Reply::Raw(StatusCode::OK, "<html>oops</html>")).await;
    let err = list_accidents(&fake.client()).await.unwrap_err();
    assert_eq!(err.kind(), "upstream_malformed");
}

#[tokio::test]
async fn unreachable_store_is_upstream_unavailable() {
    let addr = closed_address().await;
    let store = HttpAccidentStore::new(StoreConfig::new(format!("http://{addr}"))).unwrap();

    let err = list_accidents(&store).await.unwrap_err();
    assert!(matches!(err, Error::UpstreamUnavailable { .. }), "{err:?}");
}

#[tokio::test]
async fn slow_store_times_out() {
    let fake = FakeStore::start(Reply::Stall(Duration::from_secs(5))).await;
    let store = fake.client_with_timeout(Duration::from_millis(200));

    let err = get_accident(&store, "a1").await.unwrap_err();
    assert_eq!(err.kind(), "timeout");
}

#[tokio::test]
async fn invalid_id_makes_no_store_call() {
    let fake = FakeStore::json(Value::Null).await;
    let err = get_accident(&fake.client(), "a.b").await.unwrap_err();
    assert_eq!(err.kind(), "validation_error");
    assert!(fake.requests().is_empty());
}
