//! User data model.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Maximum allowed length for a user name.
pub const USER_NAME_MAX: usize = 255;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 512;

/// Validation errors returned when building or patching users.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("email must be a valid address")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
}

fn validate_name(name: String) -> Result<String, UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName);
    }
    if name.chars().count() > USER_NAME_MAX {
        return Err(UserValidationError::NameTooLong {
            max: USER_NAME_MAX,
        });
    }
    Ok(name)
}

fn validate_email(email: String) -> Result<String, UserValidationError> {
    if email.chars().count() > EMAIL_MAX {
        return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
    }
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        })
        && !email.chars().any(char::is_whitespace);
    if valid {
        Ok(email)
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

/// Validated payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    name: String,
    email: String,
}

impl NewUser {
    /// Validate the name and email of a user to register.
    ///
    /// # Examples
    /// ```
    /// use shareit::domain::NewUser;
    ///
    /// let user = NewUser::new("Ada", "ada@example.com").expect("valid user");
    /// assert_eq!(user.email(), "ada@example.com");
    /// assert!(NewUser::new("Ada", "not-an-email").is_err());
    /// ```
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            name: validate_name(name.into())?,
            email: validate_email(email.into())?,
        })
    }

    /// Name of the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address of the user.
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Partial update of a user; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
}

impl User {
    /// Attach a store-assigned identifier to a validated registration.
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        Self {
            id,
            name: new_user.name,
            email: new_user.email,
        }
    }

    /// Rehydrate a user from trusted storage.
    pub fn from_parts(id: UserId, name: String, email: String) -> Self {
        Self { id, name, email }
    }

    /// Stable identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Name of the user.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address of the user.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Apply a partial update, validating only the supplied fields.
    pub fn apply(mut self, patch: UserPatch) -> Result<Self, UserValidationError> {
        if let Some(name) = patch.name {
            self.name = validate_name(name)?;
        }
        if let Some(email) = patch.email {
            self.email = validate_email(email)?;
        }
        Ok(self)
    }
}
