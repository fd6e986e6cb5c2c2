use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{info, instrument};

use crate::{
    auth::policy::{authorize, object_scope, Action, Identity},
    error::AppError,
    objects::{
        dto::{ObjectPayload, ObjectResponse},
        repo::ConstructionObject,
    },
    state::AppState,
};

pub fn object_routes() -> Router<AppState> {
    Router::new()
        .route("/objects", get(list_objects).post(create_object))
        .route(
            "/objects/:id",
            get(get_object).put(update_object).delete(delete_object),
        )
}

#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn list_objects(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Vec<ObjectResponse>>, AppError> {
    authorize(&identity, Action::ListObjects)?;

    let scope = object_scope(&identity);
    let objects = ConstructionObject::list(&state.db, scope).await?;
    Ok(Json(objects.into_iter().map(ObjectResponse::from).collect()))
}

/// Clients get the same 404 for a foreign row as for a missing one.
#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn get_object(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
) -> Result<Json<ObjectResponse>, AppError> {
    authorize(&identity, Action::ViewObject)?;

    let scope = object_scope(&identity);
    let object = ConstructionObject::find(&state.db, scope, id)
        .await?
        .ok_or(AppError::NotFound("object"))?;
    Ok(Json(ObjectResponse::from(object)))
}

#[instrument(skip(state, identity, payload), fields(user_id = identity.user_id))]
pub async fn create_object(
    State(state): State<AppState>,
    identity: Identity,
    Json(payload): Json<ObjectPayload>,
) -> Result<Json<ObjectResponse>, AppError> {
    authorize(&identity, Action::CreateObject)?;

    let fields = payload.validate()?;
    let object = ConstructionObject::create(&state.db, &fields).await?;

    info!(object_id = object.id, name = %object.name, "object created");
    Ok(Json(ObjectResponse::from(object)))
}

#[instrument(skip(state, identity, payload), fields(user_id = identity.user_id))]
pub async fn update_object(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
    Json(payload): Json<ObjectPayload>,
) -> Result<Json<ObjectResponse>, AppError> {
    authorize(&identity, Action::UpdateObject)?;

    let fields = payload.validate()?;
    let object = ConstructionObject::update(&state.db, id, &fields)
        .await?
        .ok_or(AppError::NotFound("object"))?;

    Ok(Json(ObjectResponse::from(object)))
}

#[instrument(skip(state, identity), fields(user_id = identity.user_id))]
pub async fn delete_object(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i32>,
) -> Result<Json<Value>, AppError> {
    authorize(&identity, Action::DeleteObject)?;

    ConstructionObject::delete(&state.db, id).await?;

    info!(object_id = id, "object deleted");
    Ok(Json(json!({ "success": true })))
}
