//! Shelf model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::rack::RackWithBooks;

/// Shelf model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Shelf {
    pub id: i32,
    pub name: String,
    /// File name of the generated QR code image, if one exists
    pub qr_code_path: Option<String>,
}

/// Create shelf request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateShelf {
    #[validate(length(min = 1, message = "Shelf name must not be empty"))]
    pub name: String,
}

/// Shelf with aggregate counts for the admin overview
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ShelfSummary {
    pub id: i32,
    pub name: String,
    pub qr_code_path: Option<String>,
    /// Racks on this shelf
    pub nb_racks: i64,
    /// Book titles across those racks
    pub nb_books: i64,
}

/// Shelf as seen from a QR scan: its racks with their books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShelfDetail {
    pub id: i32,
    pub name: String,
    pub qr_code_path: Option<String>,
    pub racks: Vec<RackWithBooks>,
}
