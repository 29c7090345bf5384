use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use sea_orm_migration::MigratorTrait as _;

use biblia_core::sea_ext::{is_foreign_key_violation, is_unique_violation};
use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::{Progress, ReadingTimeline};
use biblia_tracker_migration::Migrator;
use biblia_tracker_schema::{records, users};

use crate::domain::repository::{RecordRepository, UserRepository};
use crate::domain::types::{NewUser, ReadingRecord, RecordFilter, User, UserFilter};
use crate::error::TrackerError;

/// Apply every pending migration. Safe to call on an up-to-date database.
pub async fn ensure_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    Migrator::up(db, None).await.context("apply migrations")
}

/// Round-trip a trivial statement to prove the pool can reach the database.
pub async fn ping(db: &DatabaseConnection) -> anyhow::Result<()> {
    db.ping().await.context("ping database")
}

fn storage(err: DbErr, context: &'static str) -> TrackerError {
    TrackerError::Storage(anyhow::Error::new(err).context(context))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, TrackerError> {
        let mut query = users::Entity::find();
        if let Some(ref username) = filter.username {
            query = query.filter(users::Column::Username.eq(username.as_str()));
        }
        let models = query
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .context("list users")?;
        let users = models
            .into_iter()
            .map(user_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, TrackerError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TrackerError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model).transpose()?)
    }

    async fn create(&self, user: &NewUser) -> Result<User, TrackerError> {
        let model = users::ActiveModel {
            id: NotSet,
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            email: Set(user.email.clone()),
            favorite_genres: Set(genres_to_json(&user.favorite_genres)),
            created_at: Set(user.created_at),
            updated_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TrackerError::UsernameTaken
            } else {
                storage(e, "create user")
            }
        })?;
        Ok(user_from_model(model)?)
    }

    async fn save(&self, user: &User) -> Result<(), TrackerError> {
        users::ActiveModel {
            id: Set(user.id.0),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            email: Set(user.email.clone()),
            favorite_genres: Set(genres_to_json(&user.favorite_genres)),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .update(&self.db)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => TrackerError::UserNotFound,
            e if is_unique_violation(&e) => TrackerError::UsernameTaken,
            e => storage(e, "update user"),
        })?;
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, TrackerError> {
        let deleted = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                Box::pin(async move {
                    records::Entity::delete_many()
                        .filter(records::Column::UserId.eq(id.0))
                        .exec(txn)
                        .await?;
                    let result = users::Entity::delete_by_id(id.0).exec(txn).await?;
                    Ok(result.rows_affected > 0)
                })
            })
            .await
            .context("delete user with records")?;
        Ok(deleted)
    }
}

fn genres_to_json(genres: &[String]) -> sea_orm::JsonValue {
    sea_orm::JsonValue::from(genres.to_vec())
}

fn user_from_model(model: users::Model) -> anyhow::Result<User> {
    let favorite_genres = serde_json::from_value(model.favorite_genres)
        .with_context(|| format!("decode favorite_genres of user {}", model.id))?;
    Ok(User {
        id: UserId(model.id),
        username: model.username,
        password_hash: model.password_hash,
        email: model.email,
        favorite_genres,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Record repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRecordRepository {
    pub db: DatabaseConnection,
}

impl RecordRepository for DbRecordRepository {
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<ReadingRecord>, TrackerError> {
        let mut query = records::Entity::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(records::Column::UserId.eq(user_id.0));
        }
        if let Some(ref isbn) = filter.isbn {
            query = query.filter(records::Column::Isbn.eq(isbn.as_str()));
        }
        let models = query
            .order_by_asc(records::Column::UserId)
            .order_by_asc(records::Column::Isbn)
            .all(&self.db)
            .await
            .context("list records")?;
        records_from_models(models)
    }

    async fn find_by_users(&self, user_ids: &[UserId]) -> Result<Vec<ReadingRecord>, TrackerError> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }
        let models = records::Entity::find()
            .filter(records::Column::UserId.is_in(user_ids.iter().map(|id| id.0)))
            .order_by_asc(records::Column::UserId)
            .order_by_asc(records::Column::Isbn)
            .all(&self.db)
            .await
            .context("list records by user ids")?;
        records_from_models(models)
    }

    async fn find_one(
        &self,
        user_id: UserId,
        isbn: &Isbn,
    ) -> Result<Option<ReadingRecord>, TrackerError> {
        let model = records::Entity::find_by_id((user_id.0, isbn.as_str().to_owned()))
            .one(&self.db)
            .await
            .context("get record")?;
        Ok(model.map(record_from_model).transpose()?)
    }

    async fn create(&self, record: &ReadingRecord) -> Result<(), TrackerError> {
        record_to_active_model(record)
            .insert(&self.db)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    TrackerError::RecordAlreadyExists
                } else if is_foreign_key_violation(&e) {
                    TrackerError::UserNotFound
                } else {
                    storage(e, "insert record")
                }
            })?;
        Ok(())
    }

    async fn save(&self, record: &ReadingRecord) -> Result<(), TrackerError> {
        record_to_active_model(record)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => TrackerError::RecordNotFound,
                e => storage(e, "update record"),
            })?;
        Ok(())
    }

    async fn delete(&self, user_id: UserId, isbn: &Isbn) -> Result<bool, TrackerError> {
        let result = records::Entity::delete_by_id((user_id.0, isbn.as_str().to_owned()))
            .exec(&self.db)
            .await
            .context("delete record")?;
        Ok(result.rows_affected > 0)
    }
}

fn record_to_active_model(record: &ReadingRecord) -> records::ActiveModel {
    records::ActiveModel {
        user_id: Set(record.user_id.0),
        isbn: Set(record.isbn.as_str().to_owned()),
        title: Set(record.title.clone()),
        author: Set(record.author.clone()),
        cover: Set(record.cover.clone()),
        genre: Set(record.genre.clone()),
        status: Set(record.status.as_str().to_owned()),
        current_page: Set(record.progress.current_page()),
        total_pages: Set(record.progress.total_pages()),
        started_at: Set(record.timeline.started_at),
        stopped_at: Set(record.timeline.stopped_at),
        finished_at: Set(record.timeline.finished_at),
        created_at: Set(record.created_at),
        updated_at: Set(record.updated_at),
    }
}

fn records_from_models(models: Vec<records::Model>) -> Result<Vec<ReadingRecord>, TrackerError> {
    let records = models
        .into_iter()
        .map(record_from_model)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(records)
}

fn record_from_model(model: records::Model) -> anyhow::Result<ReadingRecord> {
    let key = format!("({}, {})", model.user_id, model.isbn);
    Ok(ReadingRecord {
        user_id: UserId(model.user_id),
        isbn: Isbn::parse(&model.isbn).with_context(|| format!("decode isbn of record {key}"))?,
        status: model
            .status
            .parse()
            .with_context(|| format!("decode status of record {key}"))?,
        progress: Progress::new(model.current_page, model.total_pages)
            .with_context(|| format!("decode progress of record {key}"))?,
        timeline: ReadingTimeline {
            started_at: model.started_at,
            stopped_at: model.stopped_at,
            finished_at: model.finished_at,
        },
        title: model.title,
        author: model.author,
        cover: model.cover,
        genre: model.genre,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
