//! PostgreSQL persistence adapters using Diesel.
//!
//! Each repository port has a `Diesel*Repository` implementation sharing one
//! [`DbPool`]. Row structs (`models.rs`) and table definitions (`schema.rs`)
//! stay private to this module; adapters only translate between rows and
//! domain types.
//!
//! ```ignore
//! use shareit::outbound::persistence::{DbPool, DieselItemRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/shareit")).await?;
//! let items = DieselItemRepository::new(pool);
//! ```

mod diesel_booking_repository;
mod diesel_comment_repository;
mod diesel_error_mapping;
mod diesel_item_repository;
mod diesel_item_request_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod paging;
mod pool;
mod schema;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_item_request_repository::DieselItemRequestRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
