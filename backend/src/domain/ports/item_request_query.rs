//! Driving port for reading item requests with their answers.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, ItemRequestDetails, ItemRequestId, UserId};

/// Request queries; every operation requires an existing acting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRequestQuery: Send + Sync {
    /// One request with the items answering it.
    async fn get(&self, user: UserId, request: ItemRequestId)
    -> Result<ItemRequestDetails, Error>;

    /// The user's own requests, newest first.
    async fn list_own(&self, user: UserId) -> Result<Vec<ItemRequestDetails>, Error>;

    /// Page of other users' requests, newest first.
    async fn list_others(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequestDetails>, Error>;
}
