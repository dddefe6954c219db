//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, health, overview, racks, shelves};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shelfmark API",
        version = "1.0.0",
        description = "Library shelf and lending management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::logout,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Shelves
        shelves::list_shelves,
        shelves::create_shelf,
        shelves::get_shelf,
        shelves::regenerate_qr,
        shelves::delete_shelf,
        // Racks
        racks::list_racks,
        racks::create_rack,
        racks::delete_rack,
        // Borrows
        borrows::my_borrows,
        borrows::create_borrow,
        borrows::return_borrow,
        borrows::reissue_borrow,
        // Overview
        overview::get_overview,
    ),
    components(
        schemas(
            // Auth
            auth::LoginResponse,
            auth::LogoutResponse,
            auth::UserInfo,
            crate::models::user::Credentials,
            crate::models::user::RegisterUser,
            crate::models::user::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::BookQuery,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            // Shelves
            crate::models::shelf::Shelf,
            crate::models::shelf::CreateShelf,
            crate::models::shelf::ShelfSummary,
            crate::models::shelf::ShelfDetail,
            // Racks
            crate::models::rack::Rack,
            crate::models::rack::CreateRack,
            crate::models::rack::RackWithBooks,
            // Borrows
            borrows::BorrowRequest,
            borrows::BorrowResponse,
            crate::models::borrow::BorrowedBook,
            crate::models::borrow::BorrowDetails,
            // Overview
            overview::OverviewResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "shelves", description = "Shelf management and QR codes"),
        (name = "racks", description = "Rack management"),
        (name = "borrows", description = "Borrow lifecycle"),
        (name = "overview", description = "Library overview")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
