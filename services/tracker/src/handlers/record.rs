use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use biblia_core::envelope::ApiResponse;
use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::ReadingStatus;

use crate::domain::types::{ReadingRecord, RecordFilter};
use crate::error::TrackerError;
use crate::handlers::extract::{AppJson, AppQuery};
use crate::state::AppState;
use crate::usecase::record::{
    CreateRecordInput, CreateRecordUseCase, DeleteRecordUseCase, GetRecordUseCase,
    ListRecordsUseCase, UpdateProgressInput, UpdateProgressUseCase,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    #[serde(rename = "userID")]
    pub user_id: i32,
    pub isbn: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    pub status: ReadingStatus,
    pub current_page: i32,
    pub total_pages: i32,
    #[serde(
        rename = "dateAdded",
        serialize_with = "biblia_core::serde::to_rfc3339_ms"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "biblia_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "biblia_core::serde::to_rfc3339_ms_opt"
    )]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "biblia_core::serde::to_rfc3339_ms_opt"
    )]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "biblia_core::serde::to_rfc3339_ms_opt"
    )]
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<ReadingRecord> for RecordResponse {
    fn from(record: ReadingRecord) -> Self {
        Self {
            user_id: record.user_id.0,
            isbn: record.isbn.into_inner(),
            title: record.title,
            author: record.author,
            cover: record.cover,
            genre: record.genre,
            status: record.status,
            current_page: record.progress.current_page(),
            total_pages: record.progress.total_pages(),
            created_at: record.created_at,
            updated_at: record.updated_at,
            started_at: record.timeline.started_at,
            stopped_at: record.timeline.stopped_at,
            finished_at: record.timeline.finished_at,
        }
    }
}

/// `?userId=&isbn=`. Either may be absent when listing.
#[derive(Debug, Deserialize)]
pub struct RecordKeyQuery {
    #[serde(rename = "userId", alias = "userID")]
    pub user_id: Option<i32>,
    pub isbn: Option<String>,
}

impl RecordKeyQuery {
    fn into_filter(self) -> Result<RecordFilter, TrackerError> {
        Ok(RecordFilter {
            user_id: self.user_id.map(|id| UserId::parse(Some(id))).transpose()?,
            isbn: self.isbn.as_deref().map(Isbn::parse).transpose()?,
        })
    }

    fn into_key(self) -> Result<(UserId, Isbn), TrackerError> {
        match (self.user_id, self.isbn) {
            (Some(user_id), Some(isbn)) => {
                Ok((UserId::parse(Some(user_id))?, Isbn::parse(&isbn)?))
            }
            _ => Err(TrackerError::BadRequest(
                "Both userId and isbn parameters are required".to_owned(),
            )),
        }
    }
}

// ── GET /records ─────────────────────────────────────────────────────────────

pub async fn list_records(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordKeyQuery>,
) -> Result<ApiResponse<Vec<RecordResponse>>, TrackerError> {
    let usecase = ListRecordsUseCase {
        records: state.record_repo(),
    };
    let records = usecase.execute(query.into_filter()?).await?;
    Ok(ApiResponse::ok(
        records.into_iter().map(RecordResponse::from).collect(),
        "Records retrieved successfully",
    ))
}

// ── GET /records/detail ──────────────────────────────────────────────────────

pub async fn get_record(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordKeyQuery>,
) -> Result<ApiResponse<RecordResponse>, TrackerError> {
    let (user_id, isbn) = query.into_key()?;
    let usecase = GetRecordUseCase {
        records: state.record_repo(),
    };
    let record = usecase.execute(user_id, &isbn).await?;
    Ok(ApiResponse::ok(
        record.into(),
        "Record retrieved successfully",
    ))
}

// ── POST /records ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    #[serde(rename = "userID", alias = "userId")]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub genre: Option<String>,
    pub status: Option<ReadingStatus>,
    #[serde(default)]
    pub current_page: i32,
    #[serde(default)]
    pub total_pages: i32,
}

pub async fn create_record(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateRecordRequest>,
) -> Result<ApiResponse<RecordResponse>, TrackerError> {
    let usecase = CreateRecordUseCase {
        users: state.user_repo(),
        records: state.record_repo(),
    };
    let record = usecase
        .execute(CreateRecordInput {
            user_id: body.user_id,
            isbn: body.isbn,
            title: body.title,
            author: body.author,
            cover: body.cover,
            genre: body.genre,
            status: body.status,
            current_page: body.current_page,
            total_pages: body.total_pages,
        })
        .await?;
    Ok(ApiResponse::created(
        record.into(),
        "Record created successfully",
    ))
}

// ── PUT /records ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    pub status: Option<ReadingStatus>,
    pub current_page: i32,
}

pub async fn update_record(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordKeyQuery>,
    AppJson(body): AppJson<UpdateRecordRequest>,
) -> Result<ApiResponse<RecordResponse>, TrackerError> {
    let (user_id, isbn) = query.into_key()?;
    let usecase = UpdateProgressUseCase {
        records: state.record_repo(),
    };
    let record = usecase
        .execute(
            user_id,
            &isbn,
            UpdateProgressInput {
                status: body.status,
                current_page: body.current_page,
            },
        )
        .await?;
    Ok(ApiResponse::ok(
        record.into(),
        "Record updated successfully",
    ))
}

// ── DELETE /records ──────────────────────────────────────────────────────────

pub async fn delete_record(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecordKeyQuery>,
) -> Result<ApiResponse<()>, TrackerError> {
    let (user_id, isbn) = query.into_key()?;
    let usecase = DeleteRecordUseCase {
        records: state.record_repo(),
    };
    usecase.execute(user_id, &isbn).await?;
    Ok(ApiResponse::done("Record deleted successfully"))
}
