mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const PREFIX: &str = "/api/v1";

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let mut req = Request::builder().method(method).uri(format!("{PREFIX}{path}"));
    let body = match body {
        Some(v) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, headers, bytes.to_vec())
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

#[tokio::test]
async fn health_is_unprefixed() {
    let app = common::test_app().await.unwrap();
    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(json_of(&bytes), json!({"status": "ok"}));
}

#[tokio::test]
async fn create_list_update_delete_flow() {
    let app = common::test_app().await.unwrap();

    let (status, _, body) = send(&app, "POST", "/city_services", Some(json!({"name": "Water", "type": "Utility"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_of(&body), json!({"id": 1, "name": "Water", "type": "Utility"}));

    let (status, _, body) = send(&app, "POST", "/city_services", Some(json!({"name": "Parks"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_of(&body), json!({"id": 2, "name": "Parks", "type": null}));

    let (status, _, body) = send(&app, "GET", "/city_services", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body),
        json!([
            {"id": 1, "name": "Water", "type": "Utility"},
            {"id": 2, "name": "Parks", "type": null}
        ])
    );

    // 只更新提供的字段
    let (status, _, body) = send(&app, "PUT", "/city_services/1", Some(json!({"type": "Public Utility"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"id": 1, "name": "Water", "type": "Public Utility"}));

    let (status, _, body) = send(&app, "DELETE", "/city_services/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _, body) = send(&app, "GET", "/city_services/Water", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_of(&body), json!({"error": "Service not found"}));

    let (status, _, _) = send(&app, "DELETE", "/city_services/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_missing_or_blank_name() {
    let app = common::test_app().await.unwrap();

    for body in [json!({}), json!({"type": "Utility"}), json!({"name": "   "})] {
        let (status, _, bytes) = send(&app, "POST", "/city_services", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_of(&bytes), json!({"error": "Service name required"}));
    }

    // 非 JSON 请求体同样按缺少 name 处理
    let req = Request::builder()
        .method("POST")
        .uri(format!("{PREFIX}/city_services"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let (_, _, body) = send(&app, "GET", "/city_services", None).await;
    assert_eq!(json_of(&body), json!([]));
}

#[tokio::test]
async fn overlong_name_is_bad_request() {
    let app = common::test_app().await.unwrap();
    let long = "a".repeat(256);
    let (status, _, _) = send(&app, "POST", "/city_services", Some(json!({"name": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    send(&app, "POST", "/city_services", Some(json!({"name": "Water"}))).await;
    let (status, _, _) = send(&app, "PUT", "/city_services/1", Some(json!({"name": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_name_is_conflict() {
    let app = common::test_app().await.unwrap();
    send(&app, "POST", "/city_services", Some(json!({"name": "Water"}))).await;
    send(&app, "POST", "/city_services", Some(json!({"name": "Parks"}))).await;

    let (status, _, _) = send(&app, "POST", "/city_services", Some(json!({"name": "Water"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, _) = send(&app, "PUT", "/city_services/2", Some(json!({"name": "Water"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, _, body) = send(&app, "GET", "/city_services", None).await;
    assert_eq!(json_of(&body).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn update_edge_cases() {
    let app = common::test_app().await.unwrap();
    send(&app, "POST", "/city_services", Some(json!({"name": "Water", "type": "Utility"}))).await;

    let (status, _, _) = send(&app, "PUT", "/city_services/abc", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, "PUT", "/city_services/99", Some(json!({"name": "X"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app, "PUT", "/city_services/1", Some(json!({"name": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 空补丁不修改任何字段
    let (status, _, body) = send(&app, "PUT", "/city_services/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"id": 1, "name": "Water", "type": "Utility"}));

    let (_, _, body) = send(&app, "PUT", "/city_services/1", Some(json!({"type": null}))).await;
    assert_eq!(json_of(&body), json!({"id": 1, "name": "Water", "type": null}));

    let (status, _, _) = send(&app, "DELETE", "/city_services/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn conditional_get_by_name() {
    let app = common::test_app().await.unwrap();
    send(&app, "POST", "/city_services", Some(json!({"name": "Water", "type": "Utility"}))).await;

    let (status, headers, body) = send(&app, "GET", "/city_services/Water", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["name"], "Water");
    let etag = headers.get(header::ETAG).unwrap().to_str().unwrap().to_string();
    assert!(etag.starts_with('"') && etag.ends_with('"'));
    assert_eq!(headers.get(header::CACHE_CONTROL).unwrap(), "private, max-age=0, must-revalidate");

    let req = Request::builder()
        .uri(format!("{PREFIX}/city_services/Water"))
        .header(header::IF_NONE_MATCH, &etag)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
    assert_eq!(resp.headers().get(header::ETAG).unwrap().to_str().unwrap(), etag);
    assert!(to_bytes(resp.into_body(), usize::MAX).await.unwrap().is_empty());

    // 记录变化后旧 ETag 失效
    send(&app, "PUT", "/city_services/1", Some(json!({"type": "Water Utility"}))).await;
    let req = Request::builder()
        .uri(format!("{PREFIX}/city_services/Water"))
        .header(header::IF_NONE_MATCH, &etag)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_ne!(resp.headers().get(header::ETAG).unwrap().to_str().unwrap(), etag);
}

#[tokio::test]
async fn get_by_blank_name_is_bad_request() {
    let app = common::test_app().await.unwrap();
    let (status, _, _) = send(&app, "GET", "/city_services/%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn graphql_reflects_rest_writes() {
    let app = common::test_app().await.unwrap();
    send(&app, "POST", "/city_services", Some(json!({"name": "Water", "type": "Utility"}))).await;
    send(&app, "POST", "/city_services", Some(json!({"name": "Parks"}))).await;

    let (status, _, body) = send(&app, "POST", "/graphql", Some(json!({"query": "{ services { id name type } }"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json_of(&body)["data"]["services"],
        json!([
            {"id": 1, "name": "Water", "type": "Utility"},
            {"id": 2, "name": "Parks", "type": null}
        ])
    );

    let (_, _, body) = send(&app, "POST", "/graphql", Some(json!({"query": "{ service(id: 2) { name } }"}))).await;
    assert_eq!(json_of(&body)["data"]["service"], json!({"name": "Parks"}));

    let (_, _, body) = send(&app, "POST", "/graphql", Some(json!({"query": "{ service(id: 42) { name } }"}))).await;
    assert_eq!(json_of(&body)["data"]["service"], Value::Null);

    let (status, headers, _) = send(&app, "GET", "/graphql", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers.get(header::CONTENT_TYPE).unwrap().to_str().unwrap().starts_with("text/html"));
}

#[tokio::test]
async fn graphql_malformed_body_is_json_error() {
    let app = common::test_app().await.unwrap();
    let req = Request::builder()
        .method("POST")
        .uri(format!("{PREFIX}/graphql"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ services"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_of(&to_bytes(resp.into_body(), usize::MAX).await.unwrap());
    assert!(body["error"].is_string(), "{body}");
}

#[tokio::test]
async fn product_crud_and_validation() {
    let app = common::test_app().await.unwrap();

    let (status, _, body) = send(&app, "POST", "/products", Some(json!({"name": "Bus pass"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created = json_of(&body);
    assert_eq!(created["name"], "Bus pass");
    let id = created["id"].as_i64().unwrap();

    let (status, _, _) = send(&app, "POST", "/products", Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _, _) = send(&app, "POST", "/products", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _, body) = send(&app, "PUT", &format!("/products/{id}"), Some(json!({"name": "Metro pass"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["name"], "Metro pass");

    let (_, _, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(json_of(&body).as_array().unwrap().len(), 1);

    let (status, _, body) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!({"message": format!("Deleted product id={id}")}));

    let (status, _, _) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = common::test_app().await.unwrap();
    let resp = app
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = json_of(&to_bytes(resp.into_body(), usize::MAX).await.unwrap());
    assert!(doc["paths"].get("/city_services/{name}").is_some());
}
