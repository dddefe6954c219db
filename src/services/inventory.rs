//! Shelf, rack and book inventory service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, CreateBook, UpdateBook},
        rack::{CreateRack, Rack},
        shelf::{CreateShelf, Shelf, ShelfDetail, ShelfSummary},
    },
    repository::Repository,
    services::qr::QrService,
};

#[derive(Clone)]
pub struct InventoryService {
    repository: Repository,
    qr: QrService,
}

impl InventoryService {
    pub fn new(repository: Repository, qr: QrService) -> Self {
        Self { repository, qr }
    }

    // --- Shelves ---

    /// Create a shelf and generate its QR code.
    ///
    /// The shelf row is committed first; a failed render only logs a
    /// warning and leaves qr_code_path empty until a regenerate succeeds.
    pub async fn create_shelf(&self, request: CreateShelf) -> AppResult<Shelf> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut shelf = self.repository.shelves.create(&request.name).await?;

        match self.qr.generate(shelf.id) {
            Ok(file_name) => {
                self.repository
                    .shelves
                    .set_qr_code_path(shelf.id, &file_name)
                    .await?;
                shelf.qr_code_path = Some(file_name);
            }
            Err(e) => {
                tracing::warn!("QR generation for shelf {} failed: {}", shelf.id, e);
            }
        }

        Ok(shelf)
    }

    /// Regenerate the QR code image for an existing shelf
    pub async fn regenerate_shelf_qr(&self, shelf_id: i32) -> AppResult<Shelf> {
        let mut shelf = self.repository.shelves.get_by_id(shelf_id).await?;

        let file_name = self.qr.generate(shelf.id)?;
        self.repository
            .shelves
            .set_qr_code_path(shelf.id, &file_name)
            .await?;
        shelf.qr_code_path = Some(file_name);

        Ok(shelf)
    }

    /// List shelves with rack and book counts
    pub async fn list_shelves(&self) -> AppResult<Vec<ShelfSummary>> {
        self.repository.shelves.list_summaries().await
    }

    /// Shelf with its racks and books, the QR scan target
    pub async fn get_shelf_detail(&self, shelf_id: i32) -> AppResult<ShelfDetail> {
        self.repository.shelves.get_detail(shelf_id).await
    }

    /// Delete an empty shelf and its QR image
    pub async fn delete_shelf(&self, shelf_id: i32) -> AppResult<()> {
        self.repository.shelves.delete(shelf_id).await?;
        if let Err(e) = self.qr.remove(shelf_id) {
            tracing::warn!("Failed to remove QR image for shelf {}: {}", shelf_id, e);
        }
        Ok(())
    }

    // --- Racks ---

    /// Create a rack under an existing shelf
    pub async fn create_rack(&self, request: CreateRack) -> AppResult<Rack> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        // The shelf must exist before a rack can point at it
        self.repository.shelves.get_by_id(request.shelf_id).await?;
        self.repository
            .racks
            .create(request.number, request.shelf_id)
            .await
    }

    /// List all racks
    pub async fn list_racks(&self) -> AppResult<Vec<Rack>> {
        self.repository.racks.list().await
    }

    /// Delete an empty rack
    pub async fn delete_rack(&self, rack_id: i32) -> AppResult<()> {
        self.repository.racks.delete(rack_id).await
    }

    // --- Books ---

    /// Create a book under an existing rack
    pub async fn create_book(&self, request: CreateBook) -> AppResult<Book> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.racks.get_by_id(request.rack_id).await?;
        self.repository.books.create(&request).await
    }

    /// Edit a book; a new rack assignment must point at an existing rack
    pub async fn update_book(&self, book_id: i32, changes: UpdateBook) -> AppResult<Book> {
        changes
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if let Some(rack_id) = changes.rack_id {
            self.repository.racks.get_by_id(rack_id).await?;
        }
        self.repository.books.update(book_id, &changes).await
    }

    /// Search books with pagination
    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        self.repository.books.search(query).await
    }

    /// Get book by ID
    pub async fn get_book(&self, book_id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(book_id).await
    }

    /// Delete a book together with its borrow history
    pub async fn delete_book(&self, book_id: i32) -> AppResult<()> {
        self.repository.books.delete(book_id).await
    }

    // --- Counts for the overview ---

    pub async fn count_shelves(&self) -> AppResult<i64> {
        self.repository.shelves.count().await
    }

    pub async fn count_racks(&self) -> AppResult<i64> {
        self.repository.racks.count().await
    }

    /// Distinct titles and total copies
    pub async fn count_inventory(&self) -> AppResult<(i64, i64)> {
        self.repository.books.count_inventory().await
    }
}
