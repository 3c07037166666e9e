//! Driving port for catalog reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Item, ItemDetails, ItemId, UserId};

/// Catalog queries; the acting user must exist for every operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemQuery: Send + Sync {
    /// One item with its comments; booking annotations only for its owner.
    async fn get(&self, viewer: UserId, item: ItemId) -> Result<ItemDetails, Error>;

    /// Page of the owner's items, each annotated and with comments.
    async fn list_owned(&self, owner: UserId, page: PageRequest)
    -> Result<Vec<ItemDetails>, Error>;

    /// Page of available items matching `text`; empty text matches nothing.
    async fn search(
        &self,
        viewer: UserId,
        text: String,
        page: PageRequest,
    ) -> Result<Vec<Item>, Error>;
}
