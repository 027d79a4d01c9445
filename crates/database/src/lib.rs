//! # Library Database Crate
//!
//! This crate is the only place in the workspace that talks SQL. It owns the
//! SQLite schema and exposes a small, read-mostly API to the web server.
//!
//! ## Public API
//!
//! - `connect`: Opens the SQLite connection pool, creating the database file if absent.
//! - `run_migrations`: Idempotently creates the `books` and `reviews` tables.
//! - `seed_sample_data`: Inserts the demonstration book and review into an empty store.
//! - `DbRepository`: Holds the pool and provides the query operations
//!   (e.g., `list_books_with_reviews`, `get_pdf_path`).
//! - `DbError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;
pub mod seed;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use repository::DbRepository;
pub use seed::{seed_sample_data, SeedOutcome};
