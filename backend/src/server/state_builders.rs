//! Builders selecting the repository adapters behind the HTTP state.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use shareit::inbound::http::state::{HttpState, Repositories};
use shareit::outbound::memory::MemoryStore;
use shareit::outbound::persistence::{
    DbPool, DieselBookingRepository, DieselCommentRepository, DieselItemRepository,
    DieselItemRequestRepository, DieselUserRepository,
};

use super::ServerConfig;

fn diesel_repositories(
    pool: &DbPool,
) -> Repositories<
    DieselUserRepository,
    DieselItemRepository,
    DieselBookingRepository,
    DieselCommentRepository,
    DieselItemRequestRepository,
> {
    Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        items: Arc::new(DieselItemRepository::new(pool.clone())),
        bookings: Arc::new(DieselBookingRepository::new(pool.clone())),
        comments: Arc::new(DieselCommentRepository::new(pool.clone())),
        requests: Arc::new(DieselItemRequestRepository::new(pool.clone())),
    }
}

fn memory_repositories() -> Repositories<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore>
{
    let store = Arc::new(MemoryStore::new());
    Repositories {
        users: Arc::clone(&store),
        items: Arc::clone(&store),
        bookings: Arc::clone(&store),
        comments: Arc::clone(&store),
        requests: store,
    }
}

/// Wire the services over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            HttpState::from_repositories(diesel_repositories(pool), clock)
        }
        None => {
            info!("no database configured; using in-memory repositories");
            HttpState::from_repositories(memory_repositories(), clock)
        }
    }
}
