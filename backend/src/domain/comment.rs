//! Item comments left by users who completed a booking.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{CommentId, ItemId, UserId};

/// Maximum allowed length for a comment.
pub const COMMENT_TEXT_MAX: usize = 1024;

/// Validation errors for comment text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    #[error("comment text must not be empty")]
    Empty,
    #[error("comment text must be at most {max} characters")]
    TooLong { max: usize },
}

/// Non-blank comment body of at most [`COMMENT_TEXT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommentText(String);

impl CommentText {
    /// Validate raw comment text.
    ///
    /// # Examples
    /// ```
    /// use shareit::domain::CommentText;
    ///
    /// assert!(CommentText::new("Works great").is_ok());
    /// assert!(CommentText::new("   ").is_err());
    /// ```
    pub fn new(text: impl Into<String>) -> Result<Self, CommentValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CommentValidationError::Empty);
        }
        if text.chars().count() > COMMENT_TEXT_MAX {
            return Err(CommentValidationError::TooLong {
                max: COMMENT_TEXT_MAX,
            });
        }
        Ok(Self(text))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take ownership of the text.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for CommentText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A comment ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: CommentText,
    pub item: ItemId,
    pub author: UserId,
    pub created: NaiveDateTime,
}

/// A stored comment with its author's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub item: ItemId,
    pub author: UserId,
    pub author_name: String,
    pub created: NaiveDateTime,
}
