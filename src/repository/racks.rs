//! Racks repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::rack::Rack,
};

#[derive(Clone)]
pub struct RacksRepository {
    pool: Pool<Postgres>,
}

impl RacksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get rack by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Rack> {
        sqlx::query_as::<_, Rack>("SELECT * FROM racks WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rack with id {} not found", id)))
    }

    /// List all racks ordered by shelf and position
    pub async fn list(&self) -> AppResult<Vec<Rack>> {
        let racks = sqlx::query_as::<_, Rack>(
            "SELECT * FROM racks ORDER BY shelf_id, number",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(racks)
    }

    /// Insert a new rack
    pub async fn create(&self, number: i32, shelf_id: i32) -> AppResult<Rack> {
        let rack = sqlx::query_as::<_, Rack>(
            "INSERT INTO racks (number, shelf_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(number)
        .bind(shelf_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(rack)
    }

    /// Delete a rack; fails while books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let nb_books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE rack_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if nb_books > 0 {
            return Err(AppError::Conflict(format!(
                "Rack still holds {} book(s)",
                nb_books
            )));
        }

        let result = sqlx::query("DELETE FROM racks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Rack with id {} not found", id)));
        }
        Ok(())
    }

    /// Count racks
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM racks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
