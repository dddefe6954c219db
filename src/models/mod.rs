//! Data models for Shelfmark

pub mod book;
pub mod borrow;
pub mod rack;
pub mod shelf;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use borrow::{BorrowDetails, BorrowedBook};
pub use rack::Rack;
pub use shelf::Shelf;
pub use user::{Role, User, UserClaims};
