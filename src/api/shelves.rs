//! Shelf endpoints
//!
//! The shelf detail route is public because it is the target of the
//! printed QR codes. Everything else is administrator territory.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::shelf::{CreateShelf, Shelf, ShelfDetail, ShelfSummary},
};

use super::AuthenticatedUser;

/// List shelves with rack and book counts
#[utoipa::path(
    get,
    path = "/shelves",
    tag = "shelves",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of shelves", body = Vec<ShelfSummary>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_shelves(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ShelfSummary>>> {
    claims.require_admin()?;

    let shelves = state.services.inventory.list_shelves().await?;
    Ok(Json(shelves))
}

/// Create a new shelf
///
/// A QR code image for the shelf is rendered as a side effect; when
/// rendering fails the shelf is still created without one.
#[utoipa::path(
    post,
    path = "/shelves",
    tag = "shelves",
    security(("bearer_auth" = [])),
    request_body = CreateShelf,
    responses(
        (status = 201, description = "Shelf created", body = Shelf),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn create_shelf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(shelf): Json<CreateShelf>,
) -> AppResult<(StatusCode, Json<Shelf>)> {
    claims.require_admin()?;

    let created = state.services.inventory.create_shelf(shelf).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Get a shelf with its racks and their books
///
/// This is the page a scanned shelf QR code lands on, so it requires
/// no authentication.
#[utoipa::path(
    get,
    path = "/shelves/{id}",
    tag = "shelves",
    params(
        ("id" = i32, Path, description = "Shelf ID")
    ),
    responses(
        (status = 200, description = "Shelf contents", body = ShelfDetail),
        (status = 404, description = "Shelf not found")
    )
)]
pub async fn get_shelf(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ShelfDetail>> {
    let detail = state.services.inventory.get_shelf_detail(id).await?;
    Ok(Json(detail))
}

/// Regenerate the QR code image for a shelf
#[utoipa::path(
    post,
    path = "/shelves/{id}/regenerate-qr",
    tag = "shelves",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Shelf ID")
    ),
    responses(
        (status = 200, description = "QR code regenerated", body = Shelf),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Shelf not found")
    )
)]
pub async fn regenerate_qr(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Shelf>> {
    claims.require_admin()?;

    let shelf = state.services.inventory.regenerate_shelf_qr(id).await?;
    Ok(Json(shelf))
}

/// Delete an empty shelf
#[utoipa::path(
    delete,
    path = "/shelves/{id}",
    tag = "shelves",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Shelf ID")
    ),
    responses(
        (status = 204, description = "Shelf deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Shelf not found"),
        (status = 409, description = "Shelf still holds racks")
    )
)]
pub async fn delete_shelf(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.inventory.delete_shelf(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
