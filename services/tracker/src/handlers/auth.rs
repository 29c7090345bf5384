use axum::extract::State;
use serde::Deserialize;

use biblia_core::envelope::ApiResponse;

use crate::error::TrackerError;
use crate::handlers::extract::AppJson;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::auth::{AuthenticateUseCase, LoginInput};

// ── POST /auth/login ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<ApiResponse<UserResponse>, TrackerError> {
    let usecase = AuthenticateUseCase {
        users: state.user_repo(),
        records: state.record_repo(),
        hasher: state.hasher(),
    };
    let user = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
        })
        .await?;
    Ok(ApiResponse::ok(user.into(), "Authentication successful"))
}
