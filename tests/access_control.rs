use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::middleware::{self as axum_middleware, Next};
use axum::response::Response;
use flightontime_gate::api;
use flightontime_gate::app::{build_router, build_state};
use flightontime_gate::config::Config;
use flightontime_gate::middleware::auth as gate_auth;
use flightontime_gate::services::auth::{Principal, Role};
use flightontime_gate::services::password::PasswordHasher;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "integration-secret-integration-secret";
const ISSUER: &str = "flightontime";

fn config(extra: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = HashMap::from([
        ("AUTH_ISSUER".to_string(), ISSUER.to_string()),
        ("ACCESS_JWT_SECRET".to_string(), SECRET.to_string()),
        ("ACCESS_TOKEN_LEEWAY_SECONDS".to_string(), "0".to_string()),
        ("BCRYPT_COST".to_string(), "4".to_string()),
    ]);
    for (k, v) in extra {
        env.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| env.get(key).cloned()).expect("config")
}

fn app() -> Router {
    let config = config(&[]);
    let state = build_state(&config).expect("state");
    build_router(state, &config)
}

fn mint(sub: &str, roles: &[&str], expires_in: i64, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &json!({
            "iss": ISSUER,
            "sub": sub,
            "exp": now + expires_in,
            "iat": now,
            "jti": format!("jti-{sub}"),
            "roles": roles,
        }),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign")
}

fn user_token() -> String {
    mint("user@flightontime.com", &["USER"], 600, SECRET)
}

fn admin_token() -> String {
    mint("admin@flightontime.com", &["ROLE_ADMIN"], 600, SECRET)
}

fn expired_admin_token() -> String {
    mint("admin@flightontime.com", &["ADMIN"], -3600, SECRET)
}

fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

async fn send(req: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app().oneshot(req).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}

#[tokio::test]
async fn public_health_endpoints_answer_without_a_token() {
    let (status, _, body) = send(request(Method::GET, "/", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "flightontime-gate");

    let (status, _, body) = send(request(Method::GET, "/check/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, _, _) = send(request(Method::GET, "/generate_204", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn public_upstream_routes_pass_enforcement() {
    for (method, uri) in [
        (Method::GET, "/airlines"),
        (Method::GET, "/airports"),
        (Method::GET, "/actuator/health"),
        (Method::POST, "/auth/login"),
        (Method::POST, "/predict"),
        (Method::GET, "/swagger-ui/index.html"),
        (Method::POST, "/v3/api-docs"),
    ] {
        let (status, _, body) = send(request(method.clone(), uri, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn expired_token_does_not_block_public_route() {
    let token = expired_admin_token();
    let (status, _, _) = send(request(Method::GET, "/airlines", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(request(Method::GET, "/check/health", Some("garbage"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn method_mismatch_falls_back_to_authenticated() {
    let (status, headers, body) = send(request(Method::POST, "/airports", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers[header::WWW_AUTHENTICATE], "Bearer");
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let token = user_token();
    let (status, _, _) = send(request(Method::POST, "/airports", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn expired_token_on_admin_route_is_unauthenticated() {
    let token = expired_admin_token();
    let (status, _, body) = send(request(Method::GET, "/users/42", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn forged_token_is_unauthenticated() {
    let token = mint("admin@flightontime.com", &["ADMIN"], 600, "someone-elses-secret-someone-else");
    let (status, _, _) = send(request(Method::GET, "/users/42", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(request(Method::GET, "/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_role_is_forbidden_on_admin_routes() {
    let token = user_token();

    let (status, headers, body) = send(request(Method::DELETE, "/users/42", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(headers.get(header::WWW_AUTHENTICATE).is_none());
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, _, _) = send(request(Method::GET, "/admin", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_role_reaches_admin_routes() {
    let token = admin_token();

    let (status, _, _) = send(request(Method::GET, "/users/42", Some(&token))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, body) = send(request(Method::GET, "/admin", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["principal"]["subject"], "admin@flightontime.com");
    assert_eq!(body["principal"]["roles"], json!(["ADMIN"]));
    assert_eq!(
        body["access_rules"][0],
        json!({"method": "POST", "pattern": "/auth/**", "requirement": "PUBLIC"})
    );
    let admin_rule = body["access_rules"]
        .as_array()
        .expect("rules")
        .iter()
        .find(|rule| rule["pattern"] == "/users/**")
        .expect("users rule");
    assert_eq!(admin_rule["method"], "ANY");
    assert_eq!(admin_rule["requirement"], "ROLE(ADMIN)");
}

#[tokio::test]
async fn me_returns_the_verified_principal() {
    let token = user_token();
    let (status, _, body) = send(request(Method::GET, "/me", Some(&token))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "user@flightontime.com");
    assert_eq!(body["roles"], json!(["USER"]));
    assert_eq!(body["token_id"], "jti-user@flightontime.com");
    assert!(body["expires_at"].is_string());

    let (status, _, _) = send(request(Method::GET, "/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn dot_segments_cannot_escape_the_admin_rule() {
    let (status, _, _) = send(request(Method::GET, "/airports/../admin", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_schemes_are_ignored() {
    let req = Request::builder()
        .method(Method::GET)
        .uri("/me")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .expect("request");

    let (status, _, _) = send(req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn generated_password_hash_matches() {
    let (status, _, body) = send(request(
        Method::GET,
        "/gerar-password?password=segredo123",
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cost"], 4);
    let hash = body["hash"].as_str().expect("hash");
    assert!(PasswordHasher::default().matches("segredo123", hash));
    assert!(!PasswordHasher::default().matches("segredo124", hash));
}

#[tokio::test]
async fn generated_password_requires_input() {
    let (status, _, body) = send(request(Method::GET, "/gerar-password", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PASSWORD");

    let long = "x".repeat(73);
    let (status, _, _) = send(request(
        Method::GET,
        &format!("/gerar-password?password={long}"),
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cors_preflight_is_answered_before_authentication() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/users/42")
        .header(header::ORIGIN, "https://app.flightontime.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
        .body(Body::empty())
        .expect("request");

    let (status, headers, _) = send(req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn responses_carry_security_headers_and_request_id() {
    let (_, headers, _) = send(request(Method::POST, "/airports", None)).await;

    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers[header::CACHE_CONTROL], "no-store");
    assert!(headers.contains_key("x-request-id"));
    assert!(!headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
}

#[tokio::test]
async fn production_adds_hsts_and_restricts_origins() {
    let config = config(&[
        ("APP_ENV", "production"),
        ("CORS_ALLOWED_ORIGINS", "https://app.flightontime.com"),
    ]);
    let app = build_router(build_state(&config).expect("state"), &config);

    let req = Request::builder()
        .method(Method::GET)
        .uri("/check/health")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(req).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::STRICT_TRANSPORT_SECURITY));
    assert!(
        !response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );

    let req = Request::builder()
        .method(Method::GET)
        .uri("/check/health")
        .header(header::ORIGIN, "https://app.flightontime.com")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(req).await.expect("response");

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://app.flightontime.com"
    );
}

#[tokio::test]
async fn malformed_query_gets_the_json_error_envelope() {
    let (status, _, body) = send(request(
        Method::GET,
        "/gerar-password?password=a&password=b",
        None,
    ))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_QUERY");
    assert!(body["error"]["message"].is_string());
}

async fn attach_principal_upstream(mut req: Request<Body>, next: Next) -> Response {
    req.extensions_mut()
        .insert(Principal::new("upstream@flightontime.com").with_roles([Role::User]));
    next.run(req).await
}

#[tokio::test]
async fn attached_principal_is_not_replaced_by_a_later_token() {
    let config = config(&[]);
    let state = build_state(&config).expect("state");
    let app = gate_auth::apply(api::routes(), state.clone())
        .layer(axum_middleware::from_fn(attach_principal_upstream))
        .with_state(state);

    let token = admin_token();
    let response = app
        .oneshot(request(Method::GET, "/me", Some(&token)))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["subject"], "upstream@flightontime.com");
    assert_eq!(body["roles"], json!(["USER"]));
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn access_log_records_path_without_query() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter("info,tower_http=info")
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (status, _, _) = send(request(
        Method::GET,
        "/gerar-password?password=MyS3cretPlain",
        None,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);

    let logs = logs.contents();
    assert!(logs.contains("path=/gerar-password"), "{logs}");
    assert!(!logs.contains("MyS3cretPlain"), "{logs}");
}
