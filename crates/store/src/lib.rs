//! # Atelier Store Crate
//!
//! This crate acts as a high-level, application-specific interface to the
//! PostgreSQL database. It is the system's "permanent archive" for orders
//! and their garment images.
//!
//! ## Architectural Principles
//!
//! - **Adapter Layer:** This crate is an adapter that encapsulates all
//!   database-specific logic. It provides a clean, abstract API to the rest
//!   of the application, hiding the underlying SQL and database
//!   implementation details. The ranking and reporting engines never see it;
//!   they receive plain `Order` collections fetched through it.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and it uses
//!   a connection pool (`PgPool`) for high-performance, concurrent access.
//! - **Owned Invariants:** Queue-number assignment (max + 1, starting at 1)
//!   and the order-to-image cascade live here, behind the repository API.
//!
//! ## Public API
//!
//! - `connect`: the async function to establish the database connection pool.
//! - `run_migrations`: applies migrations, ensuring the schema is up-to-date.
//! - `Repository`: the main struct that holds the connection pool and
//!   provides all the high-level data access methods.
//! - `StoreError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod repository;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::StoreError;
pub use repository::{OrderFilters, Repository};
