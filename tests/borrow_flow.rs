//! Borrow lifecycle tests against a real database
//!
//! Needs DATABASE_URL pointing at a database with the schema applied.
//! Run with: cargo test -- --ignored

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::{SystemTime, UNIX_EPOCH};

use shelfmark_server::{error::AppError, repository::Repository};

const LOAN_PERIOD_DAYS: u16 = 15;

async fn connect() -> Pool<Postgres> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to database")
}

fn unique(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_nanos();
    format!("{}_{}", prefix, nanos)
}

struct Fixture {
    user_a: i32,
    user_b: i32,
    shelf_id: i32,
    rack_id: i32,
    book_id: i32,
}

/// Insert two users and a shelf/rack/book chain with the given quantity
async fn seed(pool: &Pool<Postgres>, quantity: i32) -> Fixture {
    let user_a: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, password, is_admin) VALUES ($1, 'x', FALSE) RETURNING id",
    )
    .bind(unique("reader_a"))
    .fetch_one(pool)
    .await
    .expect("Failed to insert user");

    let user_b: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, password, is_admin) VALUES ($1, 'x', FALSE) RETURNING id",
    )
    .bind(unique("reader_b"))
    .fetch_one(pool)
    .await
    .expect("Failed to insert user");

    let shelf_id: i32 = sqlx::query_scalar("INSERT INTO shelves (name) VALUES ($1) RETURNING id")
        .bind(unique("shelf"))
        .fetch_one(pool)
        .await
        .expect("Failed to insert shelf");

    let rack_id: i32 =
        sqlx::query_scalar("INSERT INTO racks (number, shelf_id) VALUES (1, $1) RETURNING id")
            .bind(shelf_id)
            .fetch_one(pool)
            .await
            .expect("Failed to insert rack");

    let book_id: i32 = sqlx::query_scalar(
        "INSERT INTO books (title, author, quantity, rack_id) VALUES ($1, 'Test Author', $2, $3) RETURNING id",
    )
    .bind(unique("book"))
    .bind(quantity)
    .bind(rack_id)
    .fetch_one(pool)
    .await
    .expect("Failed to insert book");

    Fixture {
        user_a,
        user_b,
        shelf_id,
        rack_id,
        book_id,
    }
}

/// Remove the fixture; deleting the book also clears its borrow records
async fn teardown(pool: &Pool<Postgres>, fixture: &Fixture) {
    sqlx::query("DELETE FROM books WHERE id = $1")
        .bind(fixture.book_id)
        .execute(pool)
        .await
        .expect("Failed to delete book");
    sqlx::query("DELETE FROM racks WHERE id = $1")
        .bind(fixture.rack_id)
        .execute(pool)
        .await
        .expect("Failed to delete rack");
    sqlx::query("DELETE FROM shelves WHERE id = $1")
        .bind(fixture.shelf_id)
        .execute(pool)
        .await
        .expect("Failed to delete shelf");
    sqlx::query("DELETE FROM users WHERE id = $1 OR id = $2")
        .bind(fixture.user_a)
        .bind(fixture.user_b)
        .execute(pool)
        .await
        .expect("Failed to delete users");
}

async fn quantity_of(pool: &Pool<Postgres>, book_id: i32) -> i32 {
    sqlx::query_scalar("SELECT quantity FROM books WHERE id = $1")
        .bind(book_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read quantity")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn borrow_creates_record_and_decrements_quantity() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 2).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");

    assert_eq!(record.user_id, fixture.user_a);
    assert_eq!(record.book_id, fixture.book_id);
    assert!(!record.returned);
    assert_eq!(record.reissue_count, 0);
    assert_eq!(
        (record.due_date - record.borrow_date).num_days(),
        LOAN_PERIOD_DAYS as i64
    );

    assert_eq!(quantity_of(&pool, fixture.book_id).await, 1);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn borrow_fails_when_no_copies_left() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 0).await;

    let result = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await;

    assert!(matches!(result, Err(AppError::BookUnavailable(_))));
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    let borrows = repository
        .borrows
        .get_outstanding(fixture.user_a)
        .await
        .expect("Listing borrows should succeed");
    assert!(borrows.is_empty());

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn second_borrow_of_same_book_is_rejected() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 3).await;

    repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("First borrow should succeed");

    let result = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await;

    assert!(matches!(result, Err(AppError::AlreadyBorrowed(_))));
    // Only the first borrow took a copy
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 2);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn return_restores_quantity_and_marks_returned() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    let returned = repository
        .borrows
        .return_book(record.id, fixture.user_a)
        .await
        .expect("Return should succeed");

    assert!(returned.returned);
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 1);

    // Settled loans drop off the outstanding list
    let outstanding = repository
        .borrows
        .get_outstanding(fixture.user_a)
        .await
        .expect("Listing borrows should succeed");
    assert!(outstanding.is_empty());

    // Returning twice must not hand back a second copy
    let result = repository.borrows.return_book(record.id, fixture.user_a).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 1);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn return_by_another_user_is_rejected() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");

    let result = repository.borrows.return_book(record.id, fixture.user_b).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    // Nothing moved
    let unchanged = repository
        .borrows
        .get_by_id(record.id)
        .await
        .expect("Record should still exist");
    assert!(!unchanged.returned);
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn reissue_moves_only_the_due_date() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");

    let reissued = repository
        .borrows
        .reissue(record.id, fixture.user_a, LOAN_PERIOD_DAYS)
        .await
        .expect("Reissue should succeed");

    assert!(reissued.due_date > record.due_date);
    assert_eq!(reissued.reissue_count, 1);
    assert_eq!(reissued.borrow_date, record.borrow_date);
    assert!(!reissued.returned);
    // Reissue never touches the copy count
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn reissue_by_another_user_is_rejected() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");

    let result = repository
        .borrows
        .reissue(record.id, fixture.user_b, LOAN_PERIOD_DAYS)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));

    let unchanged = repository
        .borrows
        .get_by_id(record.id)
        .await
        .expect("Record should still exist");
    assert_eq!(unchanged.reissue_count, 0);
    assert_eq!(unchanged.due_date, record.due_date);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn reissue_of_returned_borrow_is_rejected() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let record = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow should succeed");

    repository
        .borrows
        .return_book(record.id, fixture.user_a)
        .await
        .expect("Return should succeed");

    let result = repository
        .borrows
        .reissue(record.id, fixture.user_a, LOAN_PERIOD_DAYS)
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn concurrent_borrows_admit_exactly_one_winner() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let repo_a = repository.clone();
    let repo_b = repository.clone();
    let book_id = fixture.book_id;
    let (user_a, user_b) = (fixture.user_a, fixture.user_b);

    let task_a =
        tokio::spawn(async move { repo_a.borrows.borrow(user_a, book_id, LOAN_PERIOD_DAYS).await });
    let task_b =
        tokio::spawn(async move { repo_b.borrows.borrow(user_b, book_id, LOAN_PERIOD_DAYS).await });

    let result_a = task_a.await.expect("Task A panicked");
    let result_b = task_b.await.expect("Task B panicked");

    let winners = [&result_a, &result_b].iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1, "Exactly one of two racing borrows may succeed");

    let loser = if result_a.is_ok() { result_b } else { result_a };
    assert!(matches!(loser, Err(AppError::BookUnavailable(_))));

    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    teardown(&pool, &fixture).await;
}

#[tokio::test]
#[ignore]
async fn full_lifecycle_scenario() {
    let pool = connect().await;
    let repository = Repository::new(pool.clone());
    let fixture = seed(&pool, 1).await;

    let first = repository
        .borrows
        .borrow(fixture.user_a, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("First borrow should succeed");

    // The single copy is out, nobody gets another
    let result = repository
        .borrows
        .borrow(fixture.user_b, fixture.book_id, LOAN_PERIOD_DAYS)
        .await;
    assert!(matches!(result, Err(AppError::BookUnavailable(_))));

    repository
        .borrows
        .return_book(first.id, fixture.user_a)
        .await
        .expect("Return should succeed");

    // Once back on the shelf the previously refused user gets it
    let second = repository
        .borrows
        .borrow(fixture.user_b, fixture.book_id, LOAN_PERIOD_DAYS)
        .await
        .expect("Borrow after return should succeed");
    assert_eq!(second.user_id, fixture.user_b);
    assert_eq!(quantity_of(&pool, fixture.book_id).await, 0);

    // The settled loan is off the first user's list, the fresh one on the second's
    let a_outstanding = repository
        .borrows
        .get_outstanding(fixture.user_a)
        .await
        .expect("Listing borrows should succeed");
    assert!(a_outstanding.is_empty());

    let b_outstanding = repository
        .borrows
        .get_outstanding(fixture.user_b)
        .await
        .expect("Listing borrows should succeed");
    assert_eq!(b_outstanding.len(), 1);
    assert_eq!(b_outstanding[0].id, second.id);
    assert!(!b_outstanding[0].is_overdue);

    teardown(&pool, &fixture).await;
}
