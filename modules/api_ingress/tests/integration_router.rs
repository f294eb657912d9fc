//! Integration tests for the API Ingress router: operational endpoints, OpenAPI merge
//! and the serve loop.

use std::time::Duration;

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use utoipa::{OpenApi, ToSchema};

use api_ingress::{ApiIngress, ApiIngressConfig};
use modkit::RestfulModule;

#[derive(Serialize, ToSchema)]
struct Widget {
    id: i64,
    name: String,
}

/// Get a widget by id
#[utoipa::path(
    get,
    path = "/widgets/{id}",
    params(("id" = i64, Path, description = "Widget id")),
    responses((status = 200, description = "Widget found", body = Widget)),
    tag = "Widgets"
)]
async fn get_widget(Path(id): Path<i64>) -> Json<Widget> {
    Json(Widget {
        id,
        name: format!("widget-{id}"),
    })
}

#[derive(OpenApi)]
#[openapi(paths(get_widget), components(schemas(Widget)))]
struct WidgetsApi;

struct WidgetsModule;

impl RestfulModule for WidgetsModule {
    fn register_rest(
        &self,
        router: Router,
        openapi: &mut utoipa::openapi::OpenApi,
    ) -> anyhow::Result<Router> {
        openapi.merge(WidgetsApi::openapi());
        Ok(router.route("/widgets/{id}", get(get_widget)))
    }
}

fn ingress(enable_docs: bool) -> ApiIngress {
    ApiIngress::new(ApiIngressConfig {
        bind_addr: "127.0.0.1:0".into(),
        enable_docs,
        cors_enabled: true,
        timeout_sec: 5,
    })
}

async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let resp = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or_default())
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let router = ingress(false).build_router(&[]).unwrap();
    let (status, json) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn module_routes_are_mounted() {
    let router = ingress(false).build_router(&[&WidgetsModule]).unwrap();
    let (status, json) = get_json(router, "/widgets/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "widget-7");
}

#[tokio::test]
async fn openapi_document_contains_module_operations() {
    let router = ingress(true).build_router(&[&WidgetsModule]).unwrap();
    let (status, json) = get_json(router.clone(), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["info"]["title"], "Leaderboard API");
    assert!(json["paths"]["/widgets/{id}"]["get"].is_object());
    assert!(json["components"]["schemas"]["Widget"].is_object());

    let resp = router
        .oneshot(Request::builder().uri("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn docs_are_hidden_when_disabled() {
    let router = ingress(false).build_router(&[&WidgetsModule]).unwrap();
    let (status, json) = get_json(router, "/openapi.json").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "ROUTE_NOT_FOUND");
    assert_eq!(json["instance"], "/openapi.json");
}

#[tokio::test]
async fn serve_answers_until_cancelled() {
    let ingress = std::sync::Arc::new(ingress(false));
    let router = ingress.build_router(&[&WidgetsModule]).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let cancel = CancellationToken::new();
    let server = {
        let ingress = ingress.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { ingress.serve_on(listener, router, cancel).await })
    };

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/widgets/3"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], 3);
    assert_eq!(ingress.local_addr(), Some(addr));

    cancel.cancel();
    let res = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should stop")
        .expect("server task should not panic");
    assert!(res.is_ok());
}

struct SlowModule;

impl RestfulModule for SlowModule {
    fn register_rest(
        &self,
        router: Router,
        _openapi: &mut utoipa::openapi::OpenApi,
    ) -> anyhow::Result<Router> {
        Ok(router.route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        ))
    }
}

#[tokio::test]
async fn slow_handlers_time_out_with_408() {
    let ingress = ApiIngress::new(ApiIngressConfig {
        bind_addr: "127.0.0.1:0".into(),
        timeout_sec: 1,
        ..Default::default()
    });
    assert_eq!(ingress.get_config().timeout_sec, 1);
    let router = ingress.build_router(&[&SlowModule]).unwrap();

    let started = std::time::Instant::now();
    let resp = router
        .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    assert!(started.elapsed() < Duration::from_secs(4));
}
