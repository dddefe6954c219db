//! Rack endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rack::{CreateRack, Rack},
};

use super::AuthenticatedUser;

/// List all racks
#[utoipa::path(
    get,
    path = "/racks",
    tag = "racks",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of racks", body = Vec<Rack>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_racks(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Rack>>> {
    claims.require_admin()?;

    let racks = state.services.inventory.list_racks().await?;
    Ok(Json(racks))
}

/// Add a rack to a shelf
#[utoipa::path(
    post,
    path = "/racks",
    tag = "racks",
    security(("bearer_auth" = [])),
    request_body = CreateRack,
    responses(
        (status = 201, description = "Rack created", body = Rack),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Shelf not found")
    )
)]
pub async fn create_rack(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(rack): Json<CreateRack>,
) -> AppResult<(StatusCode, Json<Rack>)> {
    claims.require_admin()?;

    let created = state.services.inventory.create_rack(rack).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete an empty rack
#[utoipa::path(
    delete,
    path = "/racks/{id}",
    tag = "racks",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rack ID")
    ),
    responses(
        (status = 204, description = "Rack deleted"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Rack not found"),
        (status = 409, description = "Rack still holds books")
    )
)]
pub async fn delete_rack(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_admin()?;

    state.services.inventory.delete_rack(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
