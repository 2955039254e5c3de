//! # Entries API
//!
//! ## Endpoints
//!
//! - `GET /v1/entries`: list entries, paginated and filtered by date range
//! - `POST /v1/entries`: record an entry
//! - `GET /v1/entries/:id`: get one entry
//!
//! List parameters are validated against `(Pagination, DateRange)` in one
//! pass, so a request with a bad page size and a bad date gets both errors.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use formwork_schema::{field, DateRange, Pagination};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{extract_validated_json, ValidatedQuery};
use crate::state::{AppState, Entry};

// ── Request/Response DTOs ───────────────────────────────────────────

formwork_schema::record! {
    /// Body of `POST /v1/entries`.
    #[derive(Debug)]
    pub struct NewEntry {
        title: String = "title" => field::string().non_empty(),
        /// Defaults to the time of the request.
        recorded_at: Option<DateTime<Utc>> = "recordedAt" => field::date().optional(),
    }
}

/// One page of entries.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPage {
    pub items: Vec<Entry>,
    pub page_index: i64,
    pub page_size: i64,
    /// Entries matching the date range, across all pages.
    pub total: usize,
}

// ── Router ──────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/entries", get(list_entries).post(create_entry))
        .route("/v1/entries/:id", get(get_entry))
}

// ── Handlers ────────────────────────────────────────────────────────

/// GET /v1/entries. List entries, oldest first.
async fn list_entries(
    State(state): State<AppState>,
    ValidatedQuery((page, range)): ValidatedQuery<(Pagination, DateRange)>,
) -> Json<EntryPage> {
    let mut matching = state.entries.filter(|e| range.contains(&e.recorded_at));
    matching.sort_by(|a, b| a.recorded_at.cmp(&b.recorded_at).then(a.id.cmp(&b.id)));

    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(page.offset())
        .take(page.limit())
        .collect();

    Json(EntryPage {
        items,
        page_index: *page.page_index(),
        page_size: *page.page_size(),
        total,
    })
}

/// POST /v1/entries. Record a new entry.
async fn create_entry(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let req: NewEntry = extract_validated_json(body)?;
    let now = Utc::now();

    let entry = Entry {
        id: Uuid::new_v4(),
        title: req.title().clone(),
        recorded_at: req.recorded_at().unwrap_or(now),
        created_at: now,
    };

    state.entries.insert(entry.id, entry.clone());
    tracing::info!(id = %entry.id, "entry recorded");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /v1/entries/:id. Get a single entry.
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Entry>, AppError> {
    state
        .entries
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("entry {id} not found")))
}
