use super::extract::Authenticated;
use super::types::{
    HEALTH_MESSAGE, HealthResponse, LoginForm, MultiTextRequest, TextRequest, TokenResponse,
};
use crate::{
    Error, Result,
    auth::AuthService,
    prediction::{CsvRowResult, Prediction, PredictionService, TextPrediction},
};
use axum::{
    Form,
    extract::{
        Multipart, State,
        multipart::MultipartError,
        rejection::{FormRejection, JsonRejection},
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::{info, warn};

const UNSUPPORTED_FILE: &str = "File type not supported. Please upload a CSV file.";

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub predictions: Arc<PredictionService>,
    pub max_body_bytes: usize,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: HEALTH_MESSAGE.to_string(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    form: std::result::Result<Form<LoginForm>, FormRejection>,
) -> Result<Json<TokenResponse>> {
    let Form(form) = form?;
    info!("Received login request for user: {}", form.username);

    let token = state.auth.login(&form.username, &form.password).await?;

    Ok(Json(TokenResponse {
        access_token: token.access_token,
        token_type: token.token_type,
    }))
}

pub async fn predict(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    request: std::result::Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let Json(request) = request?;
    info!(
        "Received single prediction request from {} ({} bytes)",
        user.username,
        request.text.len()
    );

    let prediction = state.predictions.predict_single(&request.text).await?;
    Ok(Json(prediction))
}

pub async fn predict_multiple(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    request: std::result::Result<Json<MultiTextRequest>, JsonRejection>,
) -> Result<Json<Vec<TextPrediction>>> {
    let Json(request) = request?;
    info!(
        "Received multi prediction request from {} with {} texts",
        user.username,
        request.texts.len()
    );

    let results = state.predictions.predict_multiple(&request.texts).await?;
    Ok(Json(results))
}

pub async fn predict_csv(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    mut multipart: Multipart,
) -> Result<Json<Vec<CsvRowResult>>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error(e, state.max_body_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if !file_name.ends_with(".csv") {
            warn!("Rejected upload with file name: {:?}", file_name);
            return Err(Error::bad_request(UNSUPPORTED_FILE));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| upload_error(e, state.max_body_bytes))?;
        upload = Some((file_name, bytes));
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return Err(Error::bad_request("A CSV file must be uploaded in the 'file' field."));
    };

    info!(
        "Received CSV prediction request from {}: {} ({} bytes)",
        user.username,
        file_name,
        bytes.len()
    );

    let results = state.predictions.predict_csv(&bytes).await?;
    Ok(Json(results))
}

fn upload_error(err: MultipartError, limit: usize) -> Error {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Rejected upload over the {} byte limit", limit);
        return Error::payload_too_large(format!(
            "Upload exceeds the maximum request size of {} bytes.",
            limit
        ));
    }

    Error::bad_request(format!("Malformed upload: {}", err.body_text()))
}
