use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    error::{ApiError, ApiResult},
    extract::{UserId, ValidatedJson},
    state::AppState,
    users::{
        dto::{DeletedResponse, UserPayload, UserResponse},
        repo::UserStore,
        repo_types::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

/// Shared precondition for the id-scoped operations.
async fn load_user(store: &dyn UserStore, id: i64) -> ApiResult<User> {
    store.find_by_id(id).await?.ok_or(ApiError::NotFound)
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.users.create(&payload.into()).await?;
    info!(user_id = user.id, "user created");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<UserResponse>> {
    let user = load_user(state.users.as_ref(), id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    UserId(id): UserId,
    ValidatedJson(payload): ValidatedJson<UserPayload>,
) -> ApiResult<Json<UserResponse>> {
    load_user(state.users.as_ref(), id).await?;
    // The row can vanish between the lookup and the write.
    let user = state
        .users
        .update(id, &payload.into())
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = user.id, "user updated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> ApiResult<Json<DeletedResponse>> {
    let user = load_user(state.users.as_ref(), id).await?;
    if !state.users.delete(user.id).await? {
        return Err(ApiError::NotFound);
    }
    info!(user_id = user.id, "user deleted");
    Ok(Json(DeletedResponse {
        message: format!("User {} deleted", user.id),
    }))
}
