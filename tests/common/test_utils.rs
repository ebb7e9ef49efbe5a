use super::mocks::MockClassifier;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use emotion_api::{
    Result,
    config::{
        AuthConfig, ClassifierConfig, Config, LogsConfig, ServerConfig, default_prediction_roles,
        default_users,
    },
    server,
};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::fs;
use tower::ServiceExt; // for `oneshot`

pub const TEST_SECRET: &str = "integration-test-secret";
pub const MULTIPART_BOUNDARY: &str = "emotion-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_body_bytes: 64 * 1024 * 1024,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
        },
        auth: AuthConfig {
            secret_key: TEST_SECRET.to_string(),
            token_ttl_minutes: 30,
            prediction_roles: default_prediction_roles(),
            users: default_users(),
        },
        classifier: ClassifierConfig {
            url: "http://localhost:9000/classify".to_string(),
            api_key: None,
            top_k: None,
            timeout_secs: None,
        },
    }
}

/// Router wired to the given mock classifier
pub fn create_test_app(classifier: MockClassifier) -> Router {
    create_test_app_with_config(&create_test_config(), classifier)
}

pub fn create_test_app_with_config(config: &Config, classifier: MockClassifier) -> Router {
    let state = server::build_state(config, Arc::new(classifier)).unwrap();
    server::router(state)
}

pub fn login_request(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "username={}&password={}",
            username, password
        )))
        .unwrap()
}

/// Log in through the router and return the access token
pub async fn get_token(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(login_request(username, password))
        .await
        .unwrap();
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

pub fn json_request(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn multipart_body(file_name: &str, contents: &str) -> String {
    format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: text/csv\r\n\r\n{c}\r\n--{b}--\r\n",
        b = MULTIPART_BOUNDARY,
        f = file_name,
        c = contents
    )
}

pub fn csv_upload_request(token: Option<&str>, file_name: &str, contents: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/predict-csv/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
        );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(multipart_body(file_name, contents)))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Create a test config YAML file
pub async fn create_test_config_file(dir: &TempDir, content: &str) -> Result<String> {
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, content).await?;
    Ok(config_path.to_string_lossy().to_string())
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8080
  logs:
    level: "debug"

auth:
  secret_key: "sample-secret"
  token_ttl_minutes: 15
  prediction_roles: ["admin"]
  users:
    - username: "alice"
      password: "wonderland"
      role: "admin"
    - username: "bob"
      password: "builder"

classifier:
  url: "http://localhost:9000/models/emotion"
  api_key: "hf-test-key"
  top_k: 7
  timeout_secs: 10
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  port: "not-a-number"

auth:
  secret_key: "x"
"#;
