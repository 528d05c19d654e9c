use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use http_body_util::BodyExt;
use leadline_infrastructure::InMemoryAuditSink;
use serde_json::Value;
use tower::ServiceExt;

use crate::api_services::build_app_state;

use super::build_router;

struct TestApp {
    router: Router,
    audit_sink: Arc<InMemoryAuditSink>,
}

impl TestApp {
    fn new() -> Self {
        let audit_sink = Arc::new(InMemoryAuditSink::new());
        let state = build_app_state(audit_sink.clone(), false);
        let router = build_router(state, Some("http://localhost:3000"))
            .unwrap_or_else(|_| unreachable!());

        Self { router, audit_sink }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        principal: Option<(&str, &str)>,
        body: Option<(&str, String)>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, role)) = principal {
            builder = builder
                .header("x-principal-id", id)
                .header("x-principal-name", format!("{id} name"))
                .header("x-principal-role", role);
        }

        let request = match body {
            Some((content_type, body)) => builder
                .header(CONTENT_TYPE, content_type)
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap_or_else(|_| unreachable!());

        self.router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|_| unreachable!())
    }

    async fn audited_statuses(&self, expected: usize) -> Vec<u16> {
        for _ in 0..50 {
            let entries = self.audit_sink.entries().await;
            if entries.len() >= expected {
                return entries.iter().map(|entry| entry.status).collect();
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        self.audit_sink
            .entries()
            .await
            .iter()
            .map(|entry| entry.status)
            .collect()
    }
}

async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .unwrap_or_else(|_| unreachable!())
        .to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap_or_default()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap_or(Value::Null)
}

fn lead_json(name: &str) -> Option<(&'static str, String)> {
    Some((
        "application/json",
        serde_json::json!({ "name": name }).to_string(),
    ))
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");
}

#[tokio::test]
async fn missing_principal_is_unauthorized_and_not_audited() {
    let app = TestApp::new();

    let response = app.send(Method::GET, "/api/leads", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(app.audit_sink.entries().await.is_empty());
}

#[tokio::test]
async fn unknown_role_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .send(Method::GET, "/api/leads", Some(("u-1", "root")), None)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn me_lists_role_permissions() {
    let app = TestApp::new();

    let response = app
        .send(Method::GET, "/api/security/me", Some(("v-1", "viewer")), None)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "viewer");
    assert_eq!(
        body["permissions"],
        serde_json::json!(["lead.read.all", "contact.read", "opportunity.read", "report.read"])
    );
}

#[tokio::test]
async fn forbidden_request_is_audited_with_response_status() {
    let app = TestApp::new();

    let created = app
        .send(
            Method::POST,
            "/api/leads",
            Some(("rep-1", "sales_rep")),
            lead_json("Ann"),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let lead_id = body_json(created).await["id"]
        .as_str()
        .unwrap_or_default()
        .to_owned();

    let denied = app
        .send(
            Method::DELETE,
            &format!("/api/leads/{lead_id}"),
            Some(("v-1", "viewer")),
            None,
        )
        .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    assert_eq!(app.audited_statuses(2).await, vec![201, 403]);

    let entries = app.audit_sink.entries().await;
    assert_eq!(entries[1].principal_id, "v-1");
    assert_eq!(entries[1].method, "DELETE");
    assert_eq!(entries[1].path, format!("/api/leads/{lead_id}"));
}

#[tokio::test]
async fn sales_rep_sees_only_own_leads() {
    let app = TestApp::new();

    for (owner, name) in [("rep-1", "Ann"), ("rep-2", "Bo")] {
        let response = app
            .send(
                Method::POST,
                "/api/leads",
                Some((owner, "sales_rep")),
                lead_json(name),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .send(Method::GET, "/api/leads", Some(("rep-1", "sales_rep")), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .map(|leads| leads.iter().filter_map(|lead| lead["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Ann"]);
}

#[tokio::test]
async fn export_is_served_as_csv() {
    let app = TestApp::new();

    let created = app
        .send(
            Method::POST,
            "/api/leads",
            Some(("mgr", "manager")),
            lead_json("Acme, Inc."),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let response = app
        .send(Method::GET, "/api/leads/export", Some(("mgr", "manager")), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );

    let text = body_text(response).await;
    assert!(text.starts_with("id,name,email,phone,company,status,owner_id,created_at\n"));
    assert!(text.contains("\"Acme, Inc.\""));
}

#[tokio::test]
async fn invalid_import_reports_every_error() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/leads/import",
            Some(("rep-1", "sales_rep")),
            Some((
                "text/csv",
                "name,email,phone\n,bad,123\nBo,bo@example.com,5551234567".to_owned(),
            )),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["valid"], false);
    assert_eq!(body["imported"], 0);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn valid_import_creates_owned_leads() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/api/leads/import",
            Some(("rep-1", "sales_rep")),
            Some(("text/csv", "name,company\nAnn,Acme\nBo,Initech".to_owned())),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["imported"], 2);

    let listed = app
        .send(Method::GET, "/api/leads", Some(("rep-1", "sales_rep")), None)
        .await;
    let body = body_json(listed).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}
