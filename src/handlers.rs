// handlers.rs
use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use http::{header, StatusCode};

use crate::error::{AppError, Result};
use crate::models::VoteForm;
use crate::poll::{self, VoteOutcome};
use crate::routes::AppState;
use crate::templates::render;

/// Ids that are not integers can never match a question.
fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| AppError::NotFound)
}

pub fn results_path(question_id: i64) -> String {
    format!("/polls/{question_id}/results")
}

pub async fn root() -> Redirect {
    Redirect::permanent("/polls/")
}

/// Latest published questions
pub async fn index(State(state): State<AppState>) -> Result<Response> {
    let view = poll::latest_questions(state.store.as_ref(), Utc::now()).await?;
    render(&view)
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let view = poll::question_detail(state.store.as_ref(), parse_id(&id)?, Utc::now()).await?;
    render(&view)
}

/// Count a vote, then redirect so a refresh cannot submit it twice
pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: std::result::Result<Form<VoteForm>, FormRejection>,
) -> Result<Response> {
    // A missing or unreadable body is the same as picking nothing.
    let form = form.map(|Form(form)| form).unwrap_or_default();

    match poll::vote(state.store.as_ref(), parse_id(&id)?, form).await? {
        VoteOutcome::Recorded { question_id } => {
            Ok((StatusCode::FOUND, [(header::LOCATION, results_path(question_id))]).into_response())
        }
        VoteOutcome::InvalidSelection(view) => render(&view),
    }
}

pub async fn results(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let view = poll::question_results(state.store.as_ref(), parse_id(&id)?, Utc::now()).await?;
    render(&view)
}
