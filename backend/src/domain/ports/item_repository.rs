//! Port for catalog item persistence.
//!
//! Listings are paged with [`PageRequest`]: adapters skip
//! `page.offset()` rows and return at most `page.limit()` rows.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Item, ItemId, ItemRequestId, NewItem, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item repository adapters.
    pub enum ItemRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
        /// The item to change does not exist.
        NotFound { id: ItemId } => "item {id} not found",
    }
}

/// Port for item storage and catalog lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Store a new item and return it with its assigned identifier.
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError>;

    /// Overwrite the mutable fields of an existing item.
    async fn update(&self, item: &Item) -> Result<Item, ItemRepositoryError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError>;

    /// Page of an owner's items ordered by identifier.
    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemRepositoryError>;

    /// Page of available items whose name or description contains `text`,
    /// compared case-insensitively, ordered by identifier.
    async fn search(&self, text: &str, page: PageRequest)
    -> Result<Vec<Item>, ItemRepositoryError>;

    /// Items created in answer to a request, ordered by identifier.
    async fn list_by_request(
        &self,
        request: ItemRequestId,
    ) -> Result<Vec<Item>, ItemRepositoryError>;
}
