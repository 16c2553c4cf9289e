// HTTP route handlers for the Kiln API.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use kiln_engine::{EngineError, ExecutionRequest, Language};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub libraries: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
}

/// Failure payload shared by every endpoint: the raw diagnostic text flows
/// through the `output` field, with the HTTP status marking it as an error.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub output: String,
}

fn error_status(e: &EngineError) -> StatusCode {
    if e.is_bad_request() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// POST /execute - Run submitted source code
pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ExecuteRequest>,
) -> impl IntoResponse {
    // Reject unsupported languages before the engine touches the filesystem.
    let language: Language = match payload.language.parse() {
        Ok(language) => language,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    output: e.to_string(),
                }),
            )
                .into_response();
        }
    };

    let request = ExecutionRequest {
        language,
        source_code: payload.code,
        stdin: payload.input,
        dependencies: payload.libraries,
    };

    match state.engine.execute(&request).await {
        Ok(outcome) => {
            info!(
                language = %language,
                exit_code = outcome.exit_code,
                duration_ms = outcome.duration.as_millis() as u64,
                has_plot = outcome.plot.is_some(),
                "Request executed"
            );
            (
                StatusCode::OK,
                Json(ExecuteResponse {
                    output: outcome.stdout,
                    plot: outcome.plot,
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!(language = %language, error = %e, "Request failed");
            (
                error_status(&e),
                Json(ErrorResponse {
                    output: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub query: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub code: String,
}

/// POST /generate - Ask the generative model for code
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> impl IntoResponse {
    let Some(generator) = &state.generator else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                output: "Code generation is not configured (GEMINI_API_KEY is unset)".to_string(),
            }),
        )
            .into_response();
    };

    match generator.generate(&payload.query, &payload.language).await {
        Ok(code) => {
            info!(language = %payload.language, "Code generated");
            (StatusCode::OK, Json(GenerateResponse { code })).into_response()
        }
        Err(e) => {
            error!(error = %e, "Code generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    output: format!("Error generating code: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /status - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_request_defaults_optional_fields() {
        let payload: ExecuteRequest =
            serde_json::from_str(r#"{"code": "print(1)", "language": "python"}"#).unwrap();
        assert_eq!(payload.input, None);
        assert!(payload.libraries.is_empty());
    }

    #[test]
    fn bad_request_errors_map_to_400() {
        let err = EngineError::UnsupportedLanguage("ruby".to_string());
        assert_eq!(error_status(&err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn pipeline_errors_map_to_500() {
        for err in [
            EngineError::Compile("boom".into()),
            EngineError::Runtime("boom".into()),
            EngineError::Timeout(10_000),
            EngineError::Install("boom".into()),
            EngineError::Workspace("boom".into()),
        ] {
            assert_eq!(error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn plot_is_omitted_from_json_when_absent() {
        let body = serde_json::to_string(&ExecuteResponse {
            output: "hi\n".to_string(),
            plot: None,
        })
        .unwrap();
        assert_eq!(body, r#"{"output":"hi\n"}"#);
    }
}
