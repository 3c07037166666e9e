//! Port for item request persistence.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{ItemRequest, ItemRequestId, NewItemRequest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by item request repository adapters.
    pub enum ItemRequestRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "request repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "request repository query failed: {message}",
    }
}

/// Port for item request storage. Listings are ordered newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRequestRepository: Send + Sync {
    /// Store a request and return it with its assigned identifier.
    async fn insert(
        &self,
        request: &NewItemRequest,
    ) -> Result<ItemRequest, ItemRequestRepositoryError>;

    /// Fetch a request by identifier.
    async fn find_by_id(
        &self,
        id: ItemRequestId,
    ) -> Result<Option<ItemRequest>, ItemRequestRepositoryError>;

    /// Every request made by `requestor`.
    async fn list_by_requestor(
        &self,
        requestor: UserId,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError>;

    /// Page of requests made by anyone other than `user`.
    async fn list_excluding_requestor(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError>;
}
