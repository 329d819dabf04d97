//! Directory API endpoints
//!
//! All filtering runs against the startup snapshot; the warehouse is only
//! touched again when a filtered subset is saved.

pub mod types;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use validator::Validate;

use types::{
    OptionsQuery, OptionsResponse, SaveRequest, SaveResponse, SearchRequest, SearchResponse,
    SnapshotResponse,
};

use crate::api::types::ApiError;
use crate::data::WarehouseService;
use crate::domain::directory::{self, HierarchyField, SearchOutcome, Snapshot, export};

/// Shared state for Directory API endpoints
#[derive(Clone)]
pub struct DirectoryApiState {
    pub snapshot: Arc<Snapshot>,
    pub warehouse: Arc<WarehouseService>,
}

/// Build Directory API routes
pub fn routes(snapshot: Arc<Snapshot>, warehouse: Arc<WarehouseService>) -> Router<()> {
    let state = DirectoryApiState {
        snapshot,
        warehouse,
    };

    Router::new()
        .route("/snapshot", get(snapshot_info))
        .route("/options/{field}", get(filter_options))
        .route("/search", post(search_directory))
        .route("/export", post(export_csv))
        .route("/save", post(save_results))
        .with_state(state)
}

/// Snapshot metadata
#[utoipa::path(
    get,
    path = "/api/v1/directory/snapshot",
    tag = "directory",
    responses(
        (status = 200, description = "Snapshot metadata", body = SnapshotResponse)
    )
)]
pub async fn snapshot_info(
    State(state): State<DirectoryApiState>,
) -> Json<SnapshotResponse> {
    Json(SnapshotResponse {
        source: state.snapshot.source.clone(),
        rows: state.snapshot.len(),
        loaded_at: state.snapshot.loaded_at,
    })
}

/// Candidate values for a hierarchical selector
///
/// Values are restricted by the most specific broader selection that is
/// still set, so narrowing a broad selector immediately narrows every
/// selector beneath it.
#[utoipa::path(
    get,
    path = "/api/v1/directory/options/{field}",
    tag = "directory",
    params(
        ("field" = String, Path, description = "Selector field name"),
        OptionsQuery
    ),
    responses(
        (status = 200, description = "Candidate values, sorted, sentinel first", body = OptionsResponse),
        (status = 400, description = "Unknown selector field")
    )
)]
pub async fn filter_options(
    State(state): State<DirectoryApiState>,
    Path(field): Path<String>,
    Query(query): Query<OptionsQuery>,
) -> Result<Json<OptionsResponse>, ApiError> {
    let field = HierarchyField::parse(&field).ok_or_else(|| {
        ApiError::bad_request(
            "INVALID_FIELD",
            "field must be one of: department_acronym, department_name, \
             organization_acronym, organization_name",
        )
    })?;

    let criteria = query.into_criteria();
    let values = directory::candidate_values(&state.snapshot.rows, field, &criteria);

    Ok(Json(OptionsResponse {
        field: field.as_str().to_string(),
        values,
    }))
}

/// Evaluate the current filter selections
#[utoipa::path(
    post,
    path = "/api/v1/directory/search",
    tag = "directory",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "Search outcome", body = SearchResponse),
        (status = 400, description = "Invalid search request")
    )
)]
pub async fn search_directory(
    State(state): State<DirectoryApiState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    let criteria = validated_criteria(request, &state.snapshot)?;
    let outcome = directory::search(&state.snapshot.rows, &criteria);
    Ok(Json(SearchResponse::from_outcome(outcome)))
}

/// Download the current result as CSV
#[utoipa::path(
    post,
    path = "/api/v1/directory/export",
    tag = "directory",
    request_body = SearchRequest,
    responses(
        (status = 200, description = "CSV attachment", body = String, content_type = "text/csv"),
        (status = 400, description = "Nothing to export")
    )
)]
pub async fn export_csv(
    State(state): State<DirectoryApiState>,
    Json(request): Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let criteria = validated_criteria(request, &state.snapshot)?;
    let rows = exportable_rows(&state.snapshot, &criteria)?;
    let csv = export::to_csv(&rows);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export::EXPORT_FILENAME),
            ),
        ],
        csv,
    ))
}

/// Persist the current result to a warehouse table
#[utoipa::path(
    post,
    path = "/api/v1/directory/save",
    tag = "directory",
    request_body = SaveRequest,
    responses(
        (status = 201, description = "Table created and rows written", body = SaveResponse),
        (status = 200, description = "Rows appended to existing table", body = SaveResponse),
        (status = 400, description = "Nothing to save or invalid table name")
    )
)]
pub async fn save_results(
    State(state): State<DirectoryApiState>,
    Json(request): Json<SaveRequest>,
) -> Result<(StatusCode, Json<SaveResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request("INVALID_SAVE_REQUEST", e.to_string()))?;

    let criteria = validated_criteria(request.criteria, &state.snapshot)?;
    let rows = exportable_rows(&state.snapshot, &criteria)?;

    let outcome = state
        .warehouse
        .save_rows(&request.table_name, &rows)
        .await
        .map_err(ApiError::from_data)?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SaveResponse {
            table_name: request.table_name,
            created: outcome.created,
            rows_written: outcome.rows_written,
        }),
    ))
}

/// Validate a search request and drop stale narrower selections.
///
/// A selection that is no longer among its own candidate values (because a
/// broader selector changed underneath it) is cleared rather than producing
/// a silently empty result.
fn validated_criteria(
    request: SearchRequest,
    snapshot: &Snapshot,
) -> Result<directory::Criteria, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request("INVALID_SEARCH_REQUEST", e.to_string()))?;
    Ok(directory::normalize(&snapshot.rows, &request.into_criteria()))
}

/// Resolve the rows behind an export or save, rejecting outcomes that have
/// no materialized row set.
fn exportable_rows<'a>(
    snapshot: &'a Snapshot,
    criteria: &directory::Criteria,
) -> Result<Vec<&'a directory::Record>, ApiError> {
    match directory::search(&snapshot.rows, criteria) {
        SearchOutcome::Rows(rows) => Ok(rows),
        SearchOutcome::Empty => Ok(Vec::new()),
        SearchOutcome::NoFilter => Err(ApiError::bad_request(
            "NO_FILTER",
            "Apply at least one filter before exporting or saving",
        )),
        SearchOutcome::TooLarge { count } => Err(ApiError::bad_request(
            "RESULT_TOO_LARGE",
            format!("Result has {count} rows; refine the search before exporting or saving"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::directory::Record;

    fn snapshot() -> Snapshot {
        let rows = vec![
            Record {
                surname: Some("Tremblay".to_string()),
                title: Some("Director".to_string()),
                department_acronym: Some("DND".to_string()),
                ..Record::default()
            },
            Record {
                surname: Some("Roy".to_string()),
                title: Some("Analyst".to_string()),
                department_acronym: Some("GAC".to_string()),
                ..Record::default()
            },
        ];
        Snapshot::new("personnel", rows)
    }

    #[test]
    fn no_filter_blocks_export() {
        let snapshot = snapshot();
        let criteria = directory::Criteria::default();
        let err = exportable_rows(&snapshot, &criteria).unwrap_err();
        match err {
            ApiError::BadRequest { code, .. } => assert_eq!(code, "NO_FILTER"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_result_exports_header_only() {
        let snapshot = snapshot();
        let criteria = directory::Criteria {
            title_terms: vec!["archivist".to_string()],
            ..directory::Criteria::default()
        };
        let rows = exportable_rows(&snapshot, &criteria).unwrap();
        assert!(rows.is_empty());
        assert_eq!(export::to_csv(&rows).lines().count(), 1);
    }

    #[test]
    fn stale_selection_is_dropped_before_search() {
        let snapshot = snapshot();
        let request = SearchRequest {
            department_acronym: Some("DND".to_string()),
            // Not a valid department name under DND
            department_name: Some("Global Affairs Canada".to_string()),
            ..SearchRequest::default()
        };
        let criteria = validated_criteria(request, &snapshot).unwrap();
        assert_eq!(criteria.department_name, None);
        assert_eq!(criteria.department_acronym.as_deref(), Some("DND"));
    }
}
