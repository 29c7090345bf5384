use chrono::Utc;

use biblia_domain::ValidationError;
use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::{Progress, ReadingStatus, ReadingTimeline};

use crate::domain::repository::{RecordRepository, UserRepository};
use crate::domain::types::{ReadingRecord, RecordFilter};
use crate::error::TrackerError;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── ListRecords ──────────────────────────────────────────────────────────────

pub struct ListRecordsUseCase<R: RecordRepository> {
    pub records: R,
}

impl<R: RecordRepository> ListRecordsUseCase<R> {
    /// Narrowing by both keys yields exactly one record or `RecordNotFound`.
    pub async fn execute(&self, filter: RecordFilter) -> Result<Vec<ReadingRecord>, TrackerError> {
        match (filter.user_id, &filter.isbn) {
            (None, Some(_)) => Err(TrackerError::BadRequest(
                "userId is required when filtering by isbn".to_owned(),
            )),
            (Some(user_id), Some(isbn)) => {
                let record = self
                    .records
                    .find_one(user_id, isbn)
                    .await?
                    .ok_or(TrackerError::RecordNotFound)?;
                Ok(vec![record])
            }
            _ => self.records.find(&filter).await,
        }
    }
}

// ── GetRecord ────────────────────────────────────────────────────────────────

pub struct GetRecordUseCase<R: RecordRepository> {
    pub records: R,
}

impl<R: RecordRepository> GetRecordUseCase<R> {
    pub async fn execute(&self, user_id: UserId, isbn: &Isbn) -> Result<ReadingRecord, TrackerError> {
        self.records
            .find_one(user_id, isbn)
            .await?
            .ok_or(TrackerError::RecordNotFound)
    }
}

// ── CreateRecord ─────────────────────────────────────────────────────────────

pub struct CreateRecordInput {
    pub user_id: Option<i32>,
    pub isbn: String,
    pub title: String,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub genre: Option<String>,
    pub status: Option<ReadingStatus>,
    pub current_page: i32,
    pub total_pages: i32,
}

pub struct CreateRecordUseCase<U: UserRepository, R: RecordRepository> {
    pub users: U,
    pub records: R,
}

impl<U: UserRepository, R: RecordRepository> CreateRecordUseCase<U, R> {
    pub async fn execute(&self, input: CreateRecordInput) -> Result<ReadingRecord, TrackerError> {
        let user_id = UserId::parse(input.user_id)?;
        let isbn = Isbn::parse(&input.isbn)?;
        let title = input.title.trim().to_owned();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let progress = Progress::new(input.current_page, input.total_pages)?;

        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(TrackerError::UserNotFound);
        }
        if self.records.find_one(user_id, &isbn).await?.is_some() {
            return Err(TrackerError::RecordAlreadyExists);
        }

        let now = Utc::now();
        let status = input.status.unwrap_or_default();
        let mut timeline = ReadingTimeline::default();
        timeline.enter(status, now);

        let record = ReadingRecord {
            user_id,
            isbn,
            title,
            author: non_blank(input.author),
            cover: non_blank(input.cover),
            genre: non_blank(input.genre),
            status,
            progress,
            timeline,
            created_at: now,
            updated_at: now,
        };
        self.records.create(&record).await?;
        tracing::info!(user_id = %record.user_id, isbn = %record.isbn, "record created");
        Ok(record)
    }
}

// ── UpdateProgress ───────────────────────────────────────────────────────────

pub struct UpdateProgressInput {
    pub status: Option<ReadingStatus>,
    pub current_page: i32,
}

pub struct UpdateProgressUseCase<R: RecordRepository> {
    pub records: R,
}

impl<R: RecordRepository> UpdateProgressUseCase<R> {
    /// The stored record is left untouched when the new page is out of range.
    pub async fn execute(
        &self,
        user_id: UserId,
        isbn: &Isbn,
        input: UpdateProgressInput,
    ) -> Result<ReadingRecord, TrackerError> {
        let mut record = self
            .records
            .find_one(user_id, isbn)
            .await?
            .ok_or(TrackerError::RecordNotFound)?;
        record.progress = record.progress.advance_to(input.current_page)?;

        let now = Utc::now();
        if let Some(status) = input.status {
            if status != record.status {
                record.timeline.enter(status, now);
                record.status = status;
            }
        }
        record.updated_at = now;

        self.records.save(&record).await?;
        Ok(record)
    }
}

// ── DeleteRecord ─────────────────────────────────────────────────────────────

pub struct DeleteRecordUseCase<R: RecordRepository> {
    pub records: R,
}

impl<R: RecordRepository> DeleteRecordUseCase<R> {
    pub async fn execute(&self, user_id: UserId, isbn: &Isbn) -> Result<(), TrackerError> {
        if !self.records.delete(user_id, isbn).await? {
            return Err(TrackerError::RecordNotFound);
        }
        Ok(())
    }
}
