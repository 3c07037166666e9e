//! Port for item comment persistence.

use async_trait::async_trait;

use crate::domain::{Comment, ItemId, NewComment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "comment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a comment and return it with its author's name.
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;

    /// Comments on `item`, oldest first.
    async fn list_by_item(&self, item: ItemId) -> Result<Vec<Comment>, CommentRepositoryError>;
}
