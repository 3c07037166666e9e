//! User account service implementing [`UserCommand`] and [`UsersQuery`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::ports::{UserCommand, UserRepository, UsersQuery};
use super::store_support::{map_user_error, require_user, user_not_found};
use super::{Error, NewUser, User, UserId, UserPatch, UserValidationError};

/// User service over a [`UserRepository`].
pub struct UserService<U> {
    users: Arc<U>,
}

impl<U> Clone for UserService<U> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

impl<U> UserService<U> {
    /// Create a new service with the given repository.
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

/// Map user validation failures onto field-tagged request errors.
pub(crate) fn map_user_validation_error(error: UserValidationError) -> Error {
    let (field, code) = match error {
        UserValidationError::EmptyName => ("name", "empty_name"),
        UserValidationError::NameTooLong { .. } => ("name", "name_too_long"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::EmailTooLong { .. } => ("email", "email_too_long"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field, "code": code }))
}

#[async_trait]
impl<U> UserCommand for UserService<U>
where
    U: UserRepository,
{
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        let created = self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %created.id(), "user registered");
        Ok(created)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> Result<User, Error> {
        let current = require_user(self.users.as_ref(), id).await?;
        let patched = current.apply(patch).map_err(map_user_validation_error)?;
        let updated = self.users.update(&patched).await.map_err(map_user_error)?;
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    async fn delete(&self, id: UserId) -> Result<(), Error> {
        if self.users.delete(id).await.map_err(map_user_error)? {
            info!(user_id = %id, "user deleted");
            Ok(())
        } else {
            Err(user_not_found(id))
        }
    }
}

#[async_trait]
impl<U> UsersQuery for UserService<U>
where
    U: UserRepository,
{
    async fn get(&self, id: UserId) -> Result<User, Error> {
        require_user(self.users.as_ref(), id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list_all().await.map_err(map_user_error)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};

    fn ada() -> User {
        User::from_new(
            UserId::new(1),
            NewUser::new("Ada", "ada@example.com").expect("valid user"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let mut repo = MockUserRepository::new();
        repo.expect_insert()
            .return_once(|user| Err(UserPersistenceError::duplicate_email(user.email())));

        let service = UserService::new(Arc::new(repo));
        let error = service
            .create(NewUser::new("Ada", "ada@example.com").expect("valid user"))
            .await
            .expect_err("duplicate email");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn update_merges_patch_before_saving() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .with(eq(UserId::new(1)))
            .return_once(|_| Ok(Some(ada())));
        repo.expect_update()
            .withf(|user| user.name() == "Ada L." && user.email() == "ada@example.com")
            .times(1)
            .returning(|user| Ok(user.clone()));

        let service = UserService::new(Arc::new(repo));
        let updated = service
            .update(
                UserId::new(1),
                UserPatch {
                    name: Some("Ada L.".to_owned()),
                    email: None,
                },
            )
            .await
            .expect("update succeeds");

        assert_eq!(updated.name(), "Ada L.");
    }

    #[rstest]
    #[tokio::test]
    async fn update_reports_invalid_email_field() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(Some(ada())));
        repo.expect_update().times(0);

        let service = UserService::new(Arc::new(repo));
        let error = service
            .update(
                UserId::new(1),
                UserPatch {
                    name: None,
                    email: Some("nope".to_owned()),
                },
            )
            .await
            .expect_err("invalid email");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details().and_then(|d| d.get("field")).and_then(|f| f.as_str()),
            Some("email")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_delete().return_once(|_| Ok(false));

        let service = UserService::new(Arc::new(repo));
        let error = service.delete(UserId::new(9)).await.expect_err("unknown user");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn get_reports_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().return_once(|_| Ok(None));

        let service = UserService::new(Arc::new(repo));
        let error = service.get(UserId::new(4)).await.expect_err("missing user");

        assert_eq!(error.message(), "User 4 not found");
    }
}
