//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the email address.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// The user to change does not exist.
        NotFound { id: UserId } => "user {id} not found",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return it with its assigned identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Overwrite the name and email of an existing user.
    async fn update(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Remove a user; returns whether a record was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// All users ordered by identifier.
    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError>;
}
