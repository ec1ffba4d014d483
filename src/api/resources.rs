//! Generic list / get / create / update / delete handlers.
//!
//! One set of handlers serves every plain resource; the type parameter
//! selects table, filters and allow-lists (see `repository::registry`).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use super::{ApiResponse, AuthenticatedUser};
use crate::{
    error::{AppError, AppResult},
    models::pagination::{Page, PageParams},
    repository::resources::{Listable, Writable},
    AppState,
};

/// `GET path`, `GET path/:id`
pub fn read_only<R: Listable>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(path, get(list::<R>))
        .route(&format!("{}/:id", path), get(get_one::<R>))
}

/// Full CRUD on `path` and `path/:id`
pub fn crud<R: Writable>(router: Router<AppState>, path: &str) -> Router<AppState> {
    router
        .route(path, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/:id", path),
            get(get_one::<R>).put(update::<R>).delete(delete_one::<R>),
        )
}

/// List with filters and pagination
pub async fn list<R: Listable>(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    WithRejection(Query(page), _): WithRejection<Query<PageParams>, AppError>,
    WithRejection(Query(query), _): WithRejection<Query<R::Query>, AppError>,
) -> AppResult<Json<ApiResponse<Page<R>>>> {
    let page = state.services.resources.list::<R>(&query, &page).await?;
    Ok(ApiResponse::ok(page))
}

pub async fn get_one<R: Listable>(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<R>>> {
    let row = state.services.resources.get::<R>(id).await?;
    Ok(ApiResponse::ok(row))
}

pub async fn create<R: Writable>(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Json(data), _): WithRejection<Json<R::Create>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<R>>)> {
    if R::ADMIN_ONLY {
        claims.require_admin()?;
    }

    let row = state.services.resources.create::<R>(&data, claims.user_id).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(row, format!("{} created", R::NAME)),
    ))
}

/// Partial update limited to the resource's allow-list
pub async fn update<R: Writable>(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<R::Update>, AppError>,
) -> AppResult<Json<ApiResponse<R>>> {
    if R::ADMIN_ONLY {
        claims.require_admin()?;
    }

    let row = state
        .services
        .resources
        .update::<R>(id, &data, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(row, format!("{} updated", R::NAME)))
}

pub async fn delete_one<R: Writable>(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Value>>> {
    if R::ADMIN_ONLY {
        claims.require_admin()?;
    }

    state.services.resources.delete::<R>(id).await?;
    Ok(ApiResponse::with_message(
        json!({ "id": id }),
        format!("{} deleted", R::NAME),
    ))
}
