//! Driving port for user account mutations.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User, UserId, UserPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a user. Emails are unique (`Conflict` otherwise).
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    /// Patch name and/or email of an existing user.
    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, Error>;

    /// Remove a user.
    async fn delete(&self, id: UserId) -> Result<(), Error>;
}
