//! POST /api/answer and POST /{locale}/api/answer: answer a visitor question.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use contextor::{AskOptions, ask};
use tracing::debug;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::answer::answer_request::{AnswerRequest, AnswerResponse},
};

/// Handler: POST /api/answer (default locale)
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8080/api/answer \
///   -H 'content-type: application/json' \
///   -d '{"question":"¿Qué incluye la auditoría de seguridad?"}'
/// ```
pub async fn answer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> AppResult<Json<AnswerResponse>> {
    respond(&state, None, payload).await
}

/// Handler: POST /{locale}/api/answer
pub async fn answer_localized(
    State(state): State<Arc<AppState>>,
    Path(locale): Path<String>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> AppResult<Json<AnswerResponse>> {
    respond(&state, Some(&locale), payload).await
}

async fn respond(
    state: &AppState,
    prefix: Option<&str>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> AppResult<Json<AnswerResponse>> {
    let locale = state.resolve_locale(prefix).ok_or(AppError::NotFound)?;
    let Json(body) = payload?;

    let chars = body.question.chars().count();
    if chars > state.max_question_chars {
        return Err(AppError::InvalidField {
            field: "question",
            reason: format!(
                "{chars} characters exceeds the limit of {}",
                state.max_question_chars
            ),
            hint: Some("ask a shorter question".into()),
        });
    }

    debug!(locale, chars, "answering question");

    let qa = ask(
        state.generator.as_ref(),
        &state.kb,
        &body.question,
        &state.contextor,
        AskOptions {
            locale: Some(locale.to_string()),
        },
    )
    .await
    .map_err(AppError::Generation)?;

    Ok(Json(AnswerResponse { text: qa.answer }))
}
