use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use biblia_core::envelope::ApiResponse;
use biblia_domain::id::UserId;

use crate::domain::types::{UserFilter, UserWithRecords};
use crate::error::TrackerError;
use crate::handlers::extract::{AppJson, AppPath, AppQuery};
use crate::handlers::record::RecordResponse;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, RegisterUserUseCase, UpdateUserUseCase,
    UserInput,
};

/// Public shape of a user. Has no password field.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub favorite_genres: Vec<String>,
    pub records: Vec<RecordResponse>,
    #[serde(serialize_with = "biblia_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "biblia_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<UserWithRecords> for UserResponse {
    fn from(UserWithRecords { user, records }: UserWithRecords) -> Self {
        Self {
            id: user.id.0,
            username: user.username,
            email: user.email,
            favorite_genres: user.favorite_genres,
            records: records.into_iter().map(RecordResponse::from).collect(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Body of both `POST /users` and `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UserRequest {
    pub username: String,
    pub password: String,
    pub favorite_genres: Option<Vec<String>>,
    pub email: Option<String>,
}

impl From<UserRequest> for UserInput {
    fn from(body: UserRequest) -> Self {
        Self {
            username: body.username,
            password: body.password,
            favorite_genres: body.favorite_genres,
            email: body.email,
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub username: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListUsersQuery>,
) -> Result<ApiResponse<Vec<UserResponse>>, TrackerError> {
    let usecase = ListUsersUseCase {
        users: state.user_repo(),
        records: state.record_repo(),
    };
    let users = usecase
        .execute(UserFilter {
            username: query.username,
        })
        .await?;
    Ok(ApiResponse::ok(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    ))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<UserResponse>, TrackerError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
        records: state.record_repo(),
    };
    let user = usecase.execute(UserId::from(id)).await?;
    Ok(ApiResponse::ok(user.into(), "User retrieved successfully"))
}

// ── POST /users ──────────────────────────────────────────────────────────────

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<UserRequest>,
) -> Result<ApiResponse<UserResponse>, TrackerError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        hasher: state.hasher(),
    };
    let user = usecase.execute(body.into()).await?;
    Ok(ApiResponse::created(user.into(), "User created successfully"))
}

// ── PUT /users/{id} ──────────────────────────────────────────────────────────

pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(body): AppJson<UserRequest>,
) -> Result<ApiResponse<UserResponse>, TrackerError> {
    let usecase = UpdateUserUseCase {
        users: state.user_repo(),
        records: state.record_repo(),
        hasher: state.hasher(),
    };
    let user = usecase.execute(UserId::from(id), body.into()).await?;
    Ok(ApiResponse::ok(user.into(), "User updated successfully"))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<ApiResponse<()>, TrackerError> {
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(UserId::from(id)).await?;
    Ok(ApiResponse::done("User deleted successfully"))
}
