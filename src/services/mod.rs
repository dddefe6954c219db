//! Business logic services

pub mod borrows;
pub mod inventory;
pub mod qr;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub inventory: inventory::InventoryService,
    pub borrows: borrows::BorrowsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let qr = qr::QrService::new(config.qr.clone(), config.server.public_base_url.clone());
        Self {
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            inventory: inventory::InventoryService::new(repository.clone(), qr),
            borrows: borrows::BorrowsService::new(repository, config.borrowing.clone()),
        }
    }
}
