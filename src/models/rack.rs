//! Rack model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Rack model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rack {
    pub id: i32,
    /// Position number of the rack on its shelf
    pub number: i32,
    pub shelf_id: i32,
}

/// Create rack request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRack {
    #[validate(range(min = 1, message = "Rack number must be positive"))]
    pub number: i32,
    pub shelf_id: i32,
}

/// Rack with the books it holds
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RackWithBooks {
    pub id: i32,
    pub number: i32,
    pub books: Vec<Book>,
}
