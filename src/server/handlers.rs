use super::AppState;
use crate::core::{PushRequest, RegistryTarget};
use crate::config::DEFAULT_TAG;
use crate::utils::error::{AppError, ErrorCategory};
use crate::utils::validation::Validate;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use tokio::sync::mpsc;

const INDEX_PAGE: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>AWS ECR Docker Image Pusher</title></head>
<body>
<h1>AWS ECR Docker Image Pusher</h1>
<p>Push a local Docker image to an Amazon Elastic Container Registry repository
using your default AWS credentials.</p>
<h2>How to use</h2>
<ol>
<li>Configure the AWS CLI once with <code>aws configure</code>.</li>
<li><code>POST /api/connect</code> with <code>{"region", "account_id"}</code> to list repositories.</li>
<li><code>POST /api/push</code> with <code>{"region", "account_id", "repository", "local_image", "tag"}</code>
and read the streamed push output.</li>
</ol>
<p>Credentials come from the default AWS credential chain and are never stored.</p>
</body>
</html>
"#;

#[derive(Debug, Deserialize)]
pub struct ConnectBody {
    pub region: String,
    pub account_id: String,
}

#[derive(Debug, Serialize)]
pub struct ConnectResponse {
    pub repositories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PushBody {
    pub region: String,
    pub account_id: String,
    pub repository: String,
    pub local_image: String,
    pub tag: Option<String>,
}

pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.category() {
            ErrorCategory::Configuration => StatusCode::BAD_REQUEST,
            ErrorCategory::Registry | ErrorCategory::Authentication => StatusCode::BAD_GATEWAY,
            ErrorCategory::Docker | ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::warn!("Request failed with {}: {}", status, self.0);

        let body = json!({
            "error": self.0.user_friendly_message(),
            "suggestion": self.0.recovery_suggestion(),
        });
        (status, Json(body)).into_response()
    }
}

/// Malformed or incomplete bodies become a JSON 400 like any other bad input.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        ApiError(AppError::ConfigError {
            message: rejection.body_text(),
        })
    })
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

pub async fn connect(
    State(state): State<AppState>,
    payload: Result<Json<ConnectBody>, JsonRejection>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let body = parse_body(payload)?;
    let target = RegistryTarget::new(&body.region, &body.account_id);
    target.validate()?;

    let pusher = state.factory.create(target).await?;
    let repositories = pusher.connect().await?;

    let warning = repositories.is_empty().then(|| {
        "No ECR repositories found in this region. Please create one in the AWS console."
            .to_string()
    });

    Ok(Json(ConnectResponse {
        repositories,
        warning,
    }))
}

pub async fn push(
    State(state): State<AppState>,
    payload: Result<Json<PushBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = parse_body(payload)?;
    let target = RegistryTarget::new(&body.region, &body.account_id);
    target.validate()?;

    let tag = body.tag.as_deref().unwrap_or(DEFAULT_TAG);
    let request = PushRequest::new(&body.repository, &body.local_image, tag);
    request.validate()?;

    let pusher = state.factory.create(target).await?;
    let (tx, rx) = mpsc::channel::<String>(64);

    tokio::spawn(async move {
        let _ = tx.send("Authenticating Docker with ECR...".to_string()).await;

        let outcome = match pusher.login().await {
            Ok(_) => {
                let _ = tx.send("Docker login successful!".to_string()).await;
                let _ = tx
                    .send(format!(
                        "Pushing {} to {}",
                        request.local_image,
                        request.target_reference(pusher.target())
                    ))
                    .await;
                pusher.tag_and_push(&request, tx.clone()).await
            }
            Err(e) => Err(e),
        };

        let last_line = match outcome {
            Ok(report) => format!("SUCCESS: pushed {}", report.remote_image),
            Err(e) => format!("ERROR: {}", e.user_friendly_message()),
        };
        let _ = tx.send(last_line).await;
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|line| (Ok::<_, Infallible>(format!("{}\n", line)), rx))
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(stream),
    )
        .into_response())
}
