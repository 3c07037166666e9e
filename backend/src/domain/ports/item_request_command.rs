//! Driving port for creating item requests.

use async_trait::async_trait;

use crate::domain::{Error, ItemRequestDetails, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRequestCommand: Send + Sync {
    /// Record a request stamped with the current time.
    async fn create(
        &self,
        requestor: UserId,
        description: String,
    ) -> Result<ItemRequestDetails, Error>;
}
