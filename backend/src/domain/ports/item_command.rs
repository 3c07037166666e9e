//! Driving port for catalog mutations and comments.

use async_trait::async_trait;

use crate::domain::{Comment, CommentText, Error, Item, ItemId, ItemPatch, NewItem, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemCommand: Send + Sync {
    /// List a new item. The owner and any referenced request must exist.
    async fn create(&self, item: NewItem) -> Result<Item, Error>;

    /// Patch an item; only its owner may do so.
    async fn update(&self, owner: UserId, item: ItemId, patch: ItemPatch) -> Result<Item, Error>;

    /// Comment on an item after completing an approved booking of it.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the author or item is missing.
    /// - `InvalidRequest` ("Booking not found") when the author has no
    ///   approved booking of the item that ended before now.
    async fn add_comment(
        &self,
        author: UserId,
        item: ItemId,
        text: CommentText,
    ) -> Result<Comment, Error>;
}
