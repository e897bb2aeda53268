// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::PathRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use versecards_core::CardId;
use versecards_core::Date;
use versecards_core::ErrorKind;
use versecards_core::ErrorReport;
use versecards_core::Fallible;
use versecards_core::MemoryCard;
use versecards_core::MemoryStats;
use versecards_core::Outcome;
use versecards_core::UserId;
use versecards_core::VerseReference;

use crate::cmd::CardService;
use crate::cmd::serve::state::ServerState;

/// An error on its way out as an HTTP response.
pub struct ApiError(ErrorReport);

impl From<ErrorReport> for ApiError {
    fn from(value: ErrorReport) -> Self {
        ApiError(value)
    }
}

// Malformed paths, queries and bodies are invalid input like any other, and
// get the same JSON error body.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ErrorReport::invalid_input(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(ErrorReport::invalid_input(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ErrorReport::invalid_input(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::AlreadyExists | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Other => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{}", self.0);
        }
        (status, Json(json!({ "error": self.0.message() }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
pub struct AddCardRequest {
    verse_reference: String,
    verse_text: String,
    notes: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    outcome: String,
}

#[derive(Deserialize)]
pub struct NotesRequest {
    notes: String,
}

#[derive(Deserialize)]
pub struct AsOfQuery {
    as_of: Option<String>,
}

impl AsOfQuery {
    /// The requested date, or today.
    fn resolve(&self, service: &CardService) -> Fallible<Date> {
        match &self.as_of {
            Some(s) => s.parse(),
            None => Ok(service.today()),
        }
    }
}

pub async fn list_cards_handler(
    State(state): State<ServerState>,
    user: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Vec<MemoryCard>>> {
    let Path(user) = user?;
    let user: UserId = user.parse()?;
    let service = state.lock()?;
    Ok(Json(service.list_cards(&user)?))
}

pub async fn add_card_handler(
    State(state): State<ServerState>,
    user: Result<Path<String>, PathRejection>,
    request: Result<Json<AddCardRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MemoryCard>)> {
    let Path(user) = user?;
    let Json(request) = request?;
    let user: UserId = user.parse()?;
    let reference: VerseReference = request.verse_reference.parse()?;
    let mut service = state.lock()?;
    let card = service.add_card(&user, reference, request.verse_text, request.notes)?;
    Ok((StatusCode::CREATED, Json(card)))
}

pub async fn get_card_handler(
    State(state): State<ServerState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Json<MemoryCard>> {
    let Path((user, reference)) = path?;
    let user: UserId = user.parse()?;
    let reference: VerseReference = reference.parse()?;
    let service = state.lock()?;
    Ok(Json(service.get_card(&user, &reference)?))
}

pub async fn due_handler(
    State(state): State<ServerState>,
    user: Result<Path<String>, PathRejection>,
    query: Result<Query<AsOfQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<MemoryCard>>> {
    let Path(user) = user?;
    let Query(query) = query?;
    let user: UserId = user.parse()?;
    let service = state.lock()?;
    let as_of: Date = query.resolve(&service)?;
    Ok(Json(service.list_due_cards(&user, as_of)?))
}

pub async fn stats_handler(
    State(state): State<ServerState>,
    user: Result<Path<String>, PathRejection>,
    query: Result<Query<AsOfQuery>, QueryRejection>,
) -> ApiResult<Json<MemoryStats>> {
    let Path(user) = user?;
    let Query(query) = query?;
    let user: UserId = user.parse()?;
    let service = state.lock()?;
    let as_of: Date = query.resolve(&service)?;
    Ok(Json(service.stats(&user, as_of)?))
}

pub async fn review_handler(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    request: Result<Json<ReviewRequest>, JsonRejection>,
) -> ApiResult<Json<MemoryCard>> {
    let Path(id) = id?;
    let Json(request) = request?;
    let outcome: Outcome = request.outcome.parse()?;
    let mut service = state.lock()?;
    Ok(Json(service.record_review(CardId::new(id), outcome)?))
}

pub async fn notes_handler(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
    request: Result<Json<NotesRequest>, JsonRejection>,
) -> ApiResult<Json<MemoryCard>> {
    let Path(id) = id?;
    let Json(request) = request?;
    let mut service = state.lock()?;
    Ok(Json(service.update_notes(CardId::new(id), request.notes)?))
}

pub async fn remove_handler(
    State(state): State<ServerState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let mut service = state.lock()?;
    service.remove_card(CardId::new(id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn not_found_handler() -> ApiError {
    ApiError(ErrorReport::not_found("Not Found"))
}
