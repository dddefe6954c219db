//! Shelves repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        rack::{Rack, RackWithBooks},
        shelf::{Shelf, ShelfDetail, ShelfSummary},
    },
};

#[derive(Clone)]
pub struct ShelvesRepository {
    pool: Pool<Postgres>,
}

impl ShelvesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get shelf by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Shelf> {
        sqlx::query_as::<_, Shelf>("SELECT * FROM shelves WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Shelf with id {} not found", id)))
    }

    /// List shelves with rack and book counts
    pub async fn list_summaries(&self) -> AppResult<Vec<ShelfSummary>> {
        let shelves = sqlx::query_as::<_, ShelfSummary>(
            r#"
            SELECT s.id, s.name, s.qr_code_path,
                   COUNT(DISTINCT r.id) AS nb_racks,
                   COUNT(b.id) AS nb_books
            FROM shelves s
            LEFT JOIN racks r ON r.shelf_id = s.id
            LEFT JOIN books b ON b.rack_id = r.id
            GROUP BY s.id
            ORDER BY s.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(shelves)
    }

    /// Shelf with its racks and their books, for the scan view
    pub async fn get_detail(&self, id: i32) -> AppResult<ShelfDetail> {
        let shelf = self.get_by_id(id).await?;

        let racks = sqlx::query_as::<_, Rack>(
            "SELECT * FROM racks WHERE shelf_id = $1 ORDER BY number",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let mut detail_racks = Vec::with_capacity(racks.len());
        for rack in racks {
            let books = sqlx::query_as::<_, Book>(
                "SELECT * FROM books WHERE rack_id = $1 ORDER BY title",
            )
            .bind(rack.id)
            .fetch_all(&self.pool)
            .await?;
            detail_racks.push(RackWithBooks {
                id: rack.id,
                number: rack.number,
                books,
            });
        }

        Ok(ShelfDetail {
            id: shelf.id,
            name: shelf.name,
            qr_code_path: shelf.qr_code_path,
            racks: detail_racks,
        })
    }

    /// Insert a new shelf; the QR path is recorded once the image exists
    pub async fn create(&self, name: &str) -> AppResult<Shelf> {
        let shelf = sqlx::query_as::<_, Shelf>(
            "INSERT INTO shelves (name) VALUES ($1) RETURNING *",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(shelf)
    }

    /// Record the generated QR file name for a shelf
    pub async fn set_qr_code_path(&self, id: i32, path: &str) -> AppResult<()> {
        sqlx::query("UPDATE shelves SET qr_code_path = $1 WHERE id = $2")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a shelf; fails while racks still reference it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let nb_racks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM racks WHERE shelf_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        if nb_racks > 0 {
            return Err(AppError::Conflict(format!(
                "Shelf still holds {} rack(s)",
                nb_racks
            )));
        }

        let result = sqlx::query("DELETE FROM shelves WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Shelf with id {} not found", id)));
        }
        Ok(())
    }

    /// Count shelves
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shelves")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
