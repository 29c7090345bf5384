//! Reading record rules: status, page progress and the reading timeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Where a reader is with a book.
///
/// Wire and storage format: kebab-case string (e.g. `"on-hold"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReadingStatus {
    WantToRead,
    #[default]
    Reading,
    OnHold,
    Dropped,
    Finished,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 5] = [
        Self::WantToRead,
        Self::Reading,
        Self::OnHold,
        Self::Dropped,
        Self::Finished,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::WantToRead => "want-to-read",
            Self::Reading => "reading",
            Self::OnHold => "on-hold",
            Self::Dropped => "dropped",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownStatus(s.to_owned()))
    }
}

/// Page progress through a book. `current_page <= total_pages`, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    current_page: i32,
    total_pages: i32,
}

impl Progress {
    pub fn new(current_page: i32, total_pages: i32) -> Result<Self, ValidationError> {
        if current_page < 0 {
            return Err(ValidationError::NegativePage {
                field: "currentPage",
            });
        }
        if total_pages < 0 {
            return Err(ValidationError::NegativePage {
                field: "totalPages",
            });
        }
        if current_page > total_pages {
            return Err(ValidationError::PageOutOfRange);
        }
        Ok(Self {
            current_page,
            total_pages,
        })
    }

    /// Move to `current_page`, keeping the stored total.
    pub fn advance_to(self, current_page: i32) -> Result<Self, ValidationError> {
        Self::new(current_page, self.total_pages)
    }

    pub fn current_page(self) -> i32 {
        self.current_page
    }

    pub fn total_pages(self) -> i32 {
        self.total_pages
    }
}

/// Nullable milestones of a record, driven by status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingTimeline {
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ReadingTimeline {
    /// Record that the reader entered `status` at `now`.
    ///
    /// Callers only invoke this when the status actually changes (or on create).
    pub fn enter(&mut self, status: ReadingStatus, now: DateTime<Utc>) {
        match status {
            ReadingStatus::WantToRead => {
                self.stopped_at = None;
                self.finished_at = None;
            }
            ReadingStatus::Reading => {
                self.started_at.get_or_insert(now);
                self.stopped_at = None;
                self.finished_at = None;
            }
            ReadingStatus::OnHold | ReadingStatus::Dropped => {
                self.stopped_at = Some(now);
                self.finished_at = None;
            }
            ReadingStatus::Finished => {
                self.started_at.get_or_insert(now);
                self.stopped_at = None;
                self.finished_at = Some(now);
            }
        }
    }
}
