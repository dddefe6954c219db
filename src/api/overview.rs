//! Library overview endpoint

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::shelf::ShelfSummary};

use super::AuthenticatedUser;

/// Library overview response
#[derive(Serialize, ToSchema)]
pub struct OverviewResponse {
    /// Number of shelves
    pub shelves: i64,
    /// Number of racks
    pub racks: i64,
    /// Number of distinct book titles
    pub titles: i64,
    /// Copies currently available across all titles
    pub copies: i64,
    /// Outstanding borrows
    pub active_borrows: i64,
    /// Outstanding borrows past their due date
    pub overdue_borrows: i64,
    /// Per-shelf rack and book counts
    pub shelf_summaries: Vec<ShelfSummary>,
}

/// Get the administrator dashboard counts
#[utoipa::path(
    get,
    path = "/overview",
    tag = "overview",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Library overview", body = OverviewResponse),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn get_overview(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<OverviewResponse>> {
    claims.require_admin()?;

    let shelves = state.services.inventory.count_shelves().await?;
    let racks = state.services.inventory.count_racks().await?;
    let (titles, copies) = state.services.inventory.count_inventory().await?;
    let active_borrows = state.services.borrows.count_active().await?;
    let overdue_borrows = state.services.borrows.count_overdue().await?;
    let shelf_summaries = state.services.inventory.list_shelves().await?;

    Ok(Json(OverviewResponse {
        shelves,
        racks,
        titles,
        copies,
        active_borrows,
        overdue_borrows,
        shelf_summaries,
    }))
}
