use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::{
        password::hash_password,
        policy::{authorize, Action, Identity},
    },
    error::AppError,
    state::AppState,
    users::{
        dto::{CreateUserRequest, UpdateUserRequest, UserResponse},
        repo::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn list_users(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    authorize(&identity, Action::ListUsers)?;

    let users = User::list(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, identity, payload), fields(user_id = identity.user_id))]
pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    authorize(&identity, Action::CreateUser)?;
    payload.validate()?;

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &payload.username,
        &hash,
        payload.role,
        payload.status,
        payload.phone.as_deref(),
    )
    .await?;

    info!(created_id = user.id, username = %user.username, "user created");
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, identity, payload), fields(user_id = identity.user_id))]
pub async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    authorize(&identity, Action::UpdateUser)?;

    let user = User::update(
        &state.db,
        id,
        payload.phone.as_deref(),
        payload.role,
        payload.status,
    )
    .await?
    .ok_or(AppError::NotFound("user"))?;

    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    authorize(&identity, Action::DeleteUser { target_id: id })?;

    // Objects assigned to this user survive with client_id cleared.
    User::delete(&state.db, id).await?;

    info!(deleted_id = id, "user deleted");
    Ok(Json(json!({ "success": true })))
}
