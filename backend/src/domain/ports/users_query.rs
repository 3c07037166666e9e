//! Driving port for user-facing queries.
//!
//! Inbound adapters (HTTP handlers) use this port to fetch user-visible data
//! without importing outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Fetch one user (`NotFound` when missing).
    async fn get(&self, id: UserId) -> Result<User, Error>;

    /// Every registered user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
