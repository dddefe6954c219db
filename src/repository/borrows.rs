//! Borrow ledger repository.
//!
//! Every quantity adjustment happens here, inside a transaction that
//! locks the book row first. Concurrent borrows of the last copy
//! serialize on that lock and exactly one of them succeeds.

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowedBook},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowedBook> {
        sqlx::query_as::<_, BorrowedBook>("SELECT * FROM borrowed_books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Outstanding borrows for a user, soonest due first.
    /// Settled records stay in the table but are not listed.
    pub async fn get_outstanding(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let borrows = sqlx::query_as::<_, BorrowDetails>(
            r#"
            SELECT bb.id, bb.book_id, b.title, b.author,
                   bb.borrow_date, bb.due_date, bb.reissue_count,
                   (bb.due_date < NOW()) AS is_overdue
            FROM borrowed_books bb
            JOIN books b ON b.id = bb.book_id
            WHERE bb.user_id = $1 AND NOT bb.returned
            ORDER BY bb.due_date
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Borrow a book for a user.
    ///
    /// Takes a row lock on the book, re-checks availability and the
    /// one-outstanding-borrow rule under that lock, then inserts the
    /// record and decrements the quantity in the same transaction.
    pub async fn borrow(
        &self,
        user_id: i32,
        book_id: i32,
        loan_period_days: u16,
    ) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        let quantity: i32 = sqlx::query_scalar(
            "SELECT quantity FROM books WHERE id = $1 FOR UPDATE",
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", book_id)))?;

        if quantity <= 0 {
            return Err(AppError::BookUnavailable(format!(
                "No copies of book {} left",
                book_id
            )));
        }

        let outstanding: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM borrowed_books
                WHERE user_id = $1 AND book_id = $2 AND NOT returned
            )
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if outstanding {
            return Err(AppError::AlreadyBorrowed(format!(
                "Book {} is already borrowed by user {}",
                book_id, user_id
            )));
        }

        let now = Utc::now();
        let due_date = now + Duration::days(loan_period_days as i64);

        let record = sqlx::query_as::<_, BorrowedBook>(
            r#"
            INSERT INTO borrowed_books (user_id, book_id, borrow_date, due_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET quantity = quantity - 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Return a borrowed book.
    ///
    /// The record must belong to the acting user and still be
    /// outstanding; the book quantity comes back in the same transaction.
    pub async fn return_book(&self, borrow_id: i32, acting_user_id: i32) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowedBook>(
            "SELECT * FROM borrowed_books WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        if record.user_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Borrow record belongs to another user".to_string(),
            ));
        }

        if record.returned {
            return Err(AppError::Conflict(
                "Book has already been returned".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, BorrowedBook>(
            "UPDATE borrowed_books SET returned = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(borrow_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET quantity = quantity + 1 WHERE id = $1")
            .bind(record.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Extend an outstanding borrow by a fresh loan period.
    ///
    /// Same ownership and state checks as a return; only the due date
    /// and the reissue counter move.
    pub async fn reissue(
        &self,
        borrow_id: i32,
        acting_user_id: i32,
        loan_period_days: u16,
    ) -> AppResult<BorrowedBook> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowedBook>(
            "SELECT * FROM borrowed_books WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        if record.user_id != acting_user_id {
            return Err(AppError::Forbidden(
                "Borrow record belongs to another user".to_string(),
            ));
        }

        if record.returned {
            return Err(AppError::Conflict(
                "Cannot reissue a returned book".to_string(),
            ));
        }

        let new_due_date = Utc::now() + Duration::days(loan_period_days as i64);

        let record = sqlx::query_as::<_, BorrowedBook>(
            r#"
            UPDATE borrowed_books
            SET due_date = $1, reissue_count = reissue_count + 1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(new_due_date)
        .bind(borrow_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Count outstanding borrows
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE NOT returned",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Count outstanding borrows past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrowed_books WHERE NOT returned AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
