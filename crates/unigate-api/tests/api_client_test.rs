#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unigate_api::types::{
    AccessRuleFilter, AccessStatus, AppUserRole, AvatarUpload, CampusZoneType, LoginRequest,
    PageRequest, ReportFormat, ReportQuery,
};
use unigate_api::{
    ApiClient, CredentialStore, Error, MemoryCredentialStore, SessionToken, TokenCache,
    TransportConfig,
};

const SETTLE: Duration = Duration::from_secs(2);

// ── Helpers ─────────────────────────────────────────────────────────

struct Harness {
    server: MockServer,
    client: ApiClient,
    store: Arc<MemoryCredentialStore>,
    cache: TokenCache,
}

async fn setup_with(token: Option<&str>) -> Harness {
    let server = MockServer::start().await;
    let store = Arc::new(match token {
        Some(raw) => MemoryCredentialStore::with_token(SessionToken::new(raw)),
        None => MemoryCredentialStore::new(),
    });
    let cache = TokenCache::mirror(store.clone()).await;
    let expected = token.map(SessionToken::new);
    assert!(cache.settled(expected.as_ref(), SETTLE).await);

    let client = ApiClient::authenticated(
        &server.uri(),
        &TransportConfig::default(),
        cache.clone(),
        store.clone(),
    )
    .unwrap();

    Harness {
        server,
        client,
        store,
        cache,
    }
}

async fn setup() -> Harness {
    setup_with(Some("session-abc")).await
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 7,
        "firstName": "Olena",
        "lastName": "Koval",
        "email": "olena@uni.edu",
        "role": "Student"
    })
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_header_attached_when_token_present() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .and(header("authorization", "Bearer session-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&h.server)
        .await;

    let user = h.client.current_user().await.unwrap();
    assert_eq!(user.first_name, "Olena");
    assert_eq!(user.role, AppUserRole::Student);
}

#[tokio::test]
async fn test_no_bearer_header_without_token() {
    let h = setup_with(None).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@uni.edu", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "new-token" })))
        .mount(&h.server)
        .await;

    let resp = h
        .client
        .login(&LoginRequest {
            email: "a@uni.edu".into(),
            password: "pw".into(),
        })
        .await
        .unwrap();
    assert_eq!(resp.token, "new-token");

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_stored_token() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/accessrule/my"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.server)
        .await;

    let result = h.client.my_access_rules().await;
    assert!(
        matches!(result, Err(Error::Unauthorized { .. })),
        "expected Unauthorized, got: {result:?}"
    );

    assert!(h.cache.settled(None, SETTLE).await);
    assert_eq!(h.store.current().await, None);
}

#[tokio::test]
async fn test_forbidden_keeps_stored_token() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user/all"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Admins only" })))
        .mount(&h.server)
        .await;

    let err = h.client.list_users().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert!(err.to_string().contains("Admins only"));
    assert_eq!(
        h.store.current().await,
        Some(SessionToken::new("session-abc"))
    );
}

// ── Error mapping ───────────────────────────────────────────────────

#[tokio::test]
async fn test_problem_details_errors_are_surfaced() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/accessrule"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "One or more validation errors occurred.",
            "errors": { "StartDate": ["Invalid date"] }
        })))
        .mount(&h.server)
        .await;

    let payload = unigate_api::types::AccessRulePayload {
        user_role: AppUserRole::Staff,
        zone_type: CampusZoneType::Office,
        has_access: true,
        start_time: None,
        end_time: None,
        start_date: None,
        end_date: None,
    };
    match h.client.create_access_rule(&payload).await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 400);
            assert!(message.contains("StartDate"), "message: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_error_body() {
    let h = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/building/3"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Building not found"))
        .mount(&h.server)
        .await;

    let err = h.client.delete_building(3).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("Building not found"));
}

#[tokio::test]
async fn test_malformed_body_is_a_deserialization_error() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&h.server)
        .await;

    let result = h.client.current_user().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })));
}

// ── Access logs & rules ─────────────────────────────────────────────

#[tokio::test]
async fn test_page_params_passed_verbatim() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/accesslog/user"))
        .and(query_param("pageNum", "3"))
        .and(query_param("count", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "time": "2025-04-01T09:00:00", "status": 0, "roomName": "Lab 1", "userId": 7 },
            { "id": 2, "accessTime": "2025-04-01T10:00:00Z", "status": "Denied", "userId": 7 }
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let logs = h
        .client
        .user_access_logs(PageRequest::new(3, 50))
        .await
        .unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].status, Some(AccessStatus::Granted));
    assert_eq!(logs[1].status, Some(AccessStatus::Denied));
    assert_eq!(logs[1].room_name, None);
}

#[tokio::test]
async fn test_empty_rule_filter_matches_unfiltered_request() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/accessrule"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.server)
        .await;

    h.client
        .list_access_rules(&AccessRuleFilter::default())
        .await
        .unwrap();

    let requests = h.server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_rule_filter_sends_codes() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/accessrule"))
        .and(query_param("userRole", "4"))
        .and(query_param("startDate", "2025-02-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 11,
            "userRole": 4,
            "zoneType": "Library",
            "hasAccess": true,
            "startTime": "08:00:00",
            "endTime": "18:00:00"
        }])))
        .expect(1)
        .mount(&h.server)
        .await;

    let filter = AccessRuleFilter {
        user_role: Some(AppUserRole::Student),
        start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
        ..AccessRuleFilter::default()
    };
    let rules = h.client.list_access_rules(&filter).await.unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].zone_type, CampusZoneType::Library);
}

// ── Text and binary payloads ────────────────────────────────────────

#[tokio::test]
async fn test_text_responses_are_unquoted() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/change-password"))
        .respond_with(ResponseTemplate::new(200).set_body_string("\"Password changed\""))
        .mount(&h.server)
        .await;

    let message = h
        .client
        .change_password(&unigate_api::types::PasswordChangeRequest {
            old_password: "old".into(),
            new_password: "new".into(),
        })
        .await
        .unwrap();
    assert_eq!(message, "Password changed");
}

#[tokio::test]
async fn test_avatar_upload_is_a_signed_multipart_form() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/update-avatar"))
        .and(header("Authorization", "Bearer session-abc"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(r#"name="avatar"; filename="me.png""#))
        .and(body_string_contains("Content-Type: image/png"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"avatarUrl": "/avatars/7.png"})),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let response = h
        .client
        .update_avatar(AvatarUpload::new("me.png", b"\x89PNG fake".to_vec()))
        .await
        .unwrap();
    assert_eq!(response.avatar_url, "/avatars/7.png");
}

#[tokio::test]
async fn test_report_download_keeps_bytes_and_content_type() {
    let h = setup().await;
    let pdf = b"%PDF-1.7 fake".to_vec();

    Mock::given(method("GET"))
        .and(path("/api/report/access-logs"))
        .and(query_param("type", "pdf"))
        .and(query_param("status", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"),
        )
        .mount(&h.server)
        .await;

    let report = h
        .client
        .generate_report(&ReportQuery {
            status: Some(AccessStatus::Denied),
            format: ReportFormat::Pdf,
            ..ReportQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(report.content_type, "application/pdf");
    assert_eq!(report.bytes.as_ref(), pdf.as_slice());
    assert_eq!(report.suggested_file_name(), "report.pdf");
}

#[tokio::test]
async fn test_campus_tree_is_nested() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/building"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": "Main",
            "floors": [{ "id": 2, "number": 1, "buildingId": 1, "rooms": [] }]
        }])))
        .mount(&h.server)
        .await;

    let buildings = h.client.list_buildings().await.unwrap();
    assert_eq!(buildings[0].floors[0].number, 1);
}
