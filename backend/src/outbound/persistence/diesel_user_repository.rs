//! PostgreSQL-backed `UserRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{NewUser, User, UserId};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure, violates_unique};
use super::models::{UserRow, UserValues};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_failure(error, UserPersistenceError::connection)
}

fn map_write_error(error: DieselError, email: &str) -> UserPersistenceError {
    if violates_unique(&error, EMAIL_CONSTRAINT) {
        return UserPersistenceError::duplicate_email(email);
    }
    map_diesel_error(error)
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    map_diesel_failure(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(UserValues {
                name: user.name(),
                email: user.email(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(UserRow::into_domain)
            .map_err(|err| map_write_error(err, user.email()))
    }

    async fn update(&self, user: &User) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.find(user.id().as_i64()))
            .set(UserValues {
                name: user.name(),
                email: user.email(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, user.email()))?
            .map(UserRow::into_domain)
            .ok_or_else(|| UserPersistenceError::not_found(user.id()))
    }

    async fn delete(&self, id: UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(users::table.find(id.as_i64()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(id.as_i64())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(UserRow::into_domain))
            .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map(|rows| rows.into_iter().map(UserRow::into_domain).collect())
            .map_err(map_diesel_error)
    }
}
