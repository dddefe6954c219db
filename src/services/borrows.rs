//! Borrow lifecycle service

use crate::{
    config::BorrowingConfig,
    error::AppResult,
    models::borrow::{BorrowDetails, BorrowedBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: BorrowingConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, config: BorrowingConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for the acting user
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<BorrowedBook> {
        self.repository
            .borrows
            .borrow(user_id, book_id, self.config.loan_period_days)
            .await
    }

    /// Return a borrowed book
    pub async fn return_book(&self, borrow_id: i32, acting_user_id: i32) -> AppResult<BorrowedBook> {
        self.repository
            .borrows
            .return_book(borrow_id, acting_user_id)
            .await
    }

    /// Extend an outstanding borrow by a fresh loan period
    pub async fn reissue(&self, borrow_id: i32, acting_user_id: i32) -> AppResult<BorrowedBook> {
        self.repository
            .borrows
            .reissue(borrow_id, acting_user_id, self.config.loan_period_days)
            .await
    }

    /// Outstanding borrows for a user, soonest due first
    pub async fn get_outstanding(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.get_outstanding(user_id).await
    }

    /// Count outstanding borrows
    pub async fn count_active(&self) -> AppResult<i64> {
        self.repository.borrows.count_active().await
    }

    /// Count outstanding borrows past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        self.repository.borrows.count_overdue().await
    }
}
