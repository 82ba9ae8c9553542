use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contextor::ContextorError;
use knowledge_base::KnowledgeError;
use thiserror::Error;
use tracing::error;

use crate::{
    core::{
        app_state::ConfigError,
        http::response_envelope::{ApiErrorDetail, ApiResponse},
    },
    routes::answer::answer_request::AnswerResponse,
};

/// Body text returned to the widget when an answer cannot be produced.
pub const GENERATION_FAILED_TEXT: &str = "Server error generating response.";

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load knowledge base: {0}")]
    Knowledge(#[from] KnowledgeError),

    #[error("failed to set up text generation: {0}")]
    Llm(#[from] AiLlmError),

    #[error("invalid assistant configuration: {0}")]
    Assistant(#[source] ContextorError),

    // --- IO / server ---
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),

    #[error("server error: {0}")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("invalid `{field}`: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
        hint: Option<String>,
    },

    #[error("not found")]
    NotFound,

    /// The ask pipeline failed for one request.
    #[error("answer generation failed: {0}")]
    Generation(#[source] ContextorError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // startup-only or upstream
            AppError::Config(_)
            | AppError::Knowledge(_)
            | AppError::Llm(_)
            | AppError::Assistant(_)
            | AppError::Bind(_)
            | AppError::Server(_)
            | AppError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) | AppError::Assistant(_) => "CONFIG_ERROR",
            AppError::Knowledge(_) => "KNOWLEDGE_BASE_ERROR",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) | AppError::InvalidField { .. } => "BAD_REQUEST",
            AppError::NotFound => "NOT_FOUND",
            AppError::Generation(_) => "GENERATION_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // The widget only understands `{ "text": ... }` for answer failures.
        if let AppError::Generation(e) = &self {
            error!(error = %e, "answer generation failed");
            let body = AnswerResponse {
                text: GENERATION_FAILED_TEXT.to_string(),
            };
            return (status, Json(body)).into_response();
        }

        let details = match &self {
            AppError::InvalidField { field, hint, .. } => vec![ApiErrorDetail {
                path: Some((*field).to_string()),
                hint: hint.clone(),
            }],
            _ => Vec::new(),
        };

        if status.is_server_error() {
            error!(error = %self, code = self.error_code(), "request failed");
        }

        ApiResponse::<()>::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}
