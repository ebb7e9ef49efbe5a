use super::error::{ClientError, ClientResult};
use crate::{
    prediction::{CsvRowResult, CsvTable, MISSING_TEXT_COLUMN, Prediction, TextPrediction},
    server::types::{ErrorResponse, HealthResponse, MultiTextRequest, TextRequest, TokenResponse},
};
use reqwest::{Response, multipart};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const UPLOAD_FILE_NAME: &str = "uploaded_file.csv";

/// HTTP client for the emotion API. Holds the bearer token once logged in.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> ClientResult<&str> {
        self.token.as_deref().ok_or(ClientError::NotLoggedIn)
    }

    pub async fn health(&self) -> ClientResult<String> {
        let response = self.http.get(self.url("/")).send().await?;
        let body: HealthResponse = parse(response).await?;
        Ok(body.message)
    }

    /// Exchanges credentials for a token. A failed login clears any token.
    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<&str> {
        self.token = None;

        let response = self
            .http
            .post(self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Login rejected with status {}", response.status());
            return Err(ClientError::AuthenticationFailed);
        }

        let body: TokenResponse = response.json().await?;
        debug!("Login succeeded for {}", username);

        Ok(self.token.insert(body.access_token).as_str())
    }

    pub async fn predict_single(&self, text: &str) -> ClientResult<Prediction> {
        if text.trim().is_empty() {
            return Err(ClientError::validation("Text must not be empty."));
        }

        let response = self
            .http
            .post(self.url("/predict/"))
            .bearer_auth(self.bearer()?)
            .json(&TextRequest {
                text: text.to_string(),
            })
            .send()
            .await?;

        parse(response).await
    }

    /// One text per non-blank line of `input`.
    pub async fn predict_multiple(&self, input: &str) -> ClientResult<Vec<TextPrediction>> {
        let texts = split_lines(input);
        if texts.is_empty() {
            return Err(ClientError::validation("Please enter at least one text."));
        }

        let response = self
            .http
            .post(self.url("/predict-multiple/"))
            .bearer_auth(self.bearer()?)
            .json(&MultiTextRequest { texts })
            .send()
            .await?;

        parse(response).await
    }

    pub async fn predict_csv(&self, contents: &[u8]) -> ClientResult<Vec<CsvRowResult>> {
        let payload = prepare_csv(contents)?;

        let part = multipart::Part::bytes(payload)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("/predict-csv/"))
            .bearer_auth(self.bearer()?)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::Upload(e.to_string()))?;

        parse(response).await
    }
}

pub fn split_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses a CSV file, checks the `text` column, and re-serializes it for
/// upload.
pub fn prepare_csv(contents: &[u8]) -> ClientResult<Vec<u8>> {
    let table = CsvTable::parse(contents).map_err(|e| ClientError::Upload(e.to_string()))?;

    if table.text_column().is_none() {
        return Err(ClientError::validation(MISSING_TEXT_COLUMN));
    }

    table
        .to_bytes()
        .map_err(|e| ClientError::Upload(e.to_string()))
}

async fn parse<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| {
            if body.is_empty() {
                status.to_string()
            } else {
                body
            }
        });

    Err(ClientError::Api {
        status: status.as_u16(),
        detail,
    })
}
