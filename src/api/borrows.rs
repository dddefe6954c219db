//! Borrow lifecycle endpoints
//!
//! Members act on their own loans only; ownership of a borrow record
//! is enforced inside the repository transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        borrow::{BorrowDetails, BorrowedBook},
        user::Role,
    },
};

use super::AuthenticatedUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book ID to borrow
    pub book_id: i32,
}

/// Borrow action response with the resulting dates
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Borrow record ID
    pub id: i32,
    /// Book ID
    pub book_id: i32,
    /// Due date (ISO 8601 format)
    pub due_date: DateTime<Utc>,
    /// How many times the due date has been pushed back
    pub reissue_count: i16,
    /// Status message
    pub message: String,
}

impl BorrowResponse {
    fn new(record: BorrowedBook, message: &str) -> Self {
        Self {
            id: record.id,
            book_id: record.book_id,
            due_date: record.due_date,
            reissue_count: record.reissue_count,
            message: message.to_string(),
        }
    }
}

/// Get the acting user's outstanding loans
#[utoipa::path(
    get,
    path = "/borrows/mine",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Outstanding loans, soonest due first", body = Vec<BorrowDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.authorize(Role::Member)?;

    let borrows = state.services.borrows.get_outstanding(claims.user_id).await?;
    Ok(Json(borrows))
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copies left or already borrowed by this user")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    claims.authorize(Role::Member)?;

    let record = state
        .services
        .borrows
        .borrow(claims.user_id, request.book_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse::new(record, "Book borrowed")),
    ))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowResponse),
        (status = 403, description = "Borrow record belongs to another user"),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowResponse>> {
    claims.authorize(Role::Member)?;

    let record = state
        .services
        .borrows
        .return_book(borrow_id, claims.user_id)
        .await?;

    Ok(Json(BorrowResponse::new(record, "Book returned")))
}

/// Reissue a borrowed book for a fresh loan period
#[utoipa::path(
    post,
    path = "/borrows/{id}/reissue",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Borrow reissued", body = BorrowResponse),
        (status = 403, description = "Borrow record belongs to another user"),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn reissue_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(borrow_id): Path<i32>,
) -> AppResult<Json<BorrowResponse>> {
    claims.authorize(Role::Member)?;

    let record = state
        .services
        .borrows
        .reissue(borrow_id, claims.user_id)
        .await?;

    Ok(Json(BorrowResponse::new(record, "Borrow reissued")))
}
