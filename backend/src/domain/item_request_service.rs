//! Item request service implementing [`ItemRequestCommand`] and
//! [`ItemRequestQuery`].
//!
//! Every request view lists the items created in answer to it.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageRequest;
use serde_json::json;
use tracing::info;

use super::ports::{
    ItemRepository, ItemRequestCommand, ItemRequestQuery, ItemRequestRepository, UserRepository,
};
use super::store_support::{map_item_error, map_request_error, require_user};
use super::{
    Error, ItemRequest, ItemRequestDetails, ItemRequestId, ItemRequestValidationError,
    NewItemRequest, RequestAnswer, UserId,
};

/// Item request service.
pub struct ItemRequestService<R, I, U> {
    requests: Arc<R>,
    items: Arc<I>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<R, I, U> ItemRequestService<R, I, U> {
    /// Create a new service with the given repositories and clock.
    pub fn new(requests: Arc<R>, items: Arc<I>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            requests,
            items,
            users,
            clock,
        }
    }
}

impl<R, I, U> ItemRequestService<R, I, U>
where
    R: ItemRequestRepository,
    I: ItemRepository,
    U: UserRepository,
{
    fn map_validation_error(error: ItemRequestValidationError) -> Error {
        let code = match error {
            ItemRequestValidationError::EmptyDescription => "empty_description",
            ItemRequestValidationError::DescriptionTooLong { .. } => "description_too_long",
        };
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "description", "code": code }))
    }

    async fn with_answers(&self, request: ItemRequest) -> Result<ItemRequestDetails, Error> {
        let items = self
            .items
            .list_by_request(request.id)
            .await
            .map_err(map_item_error)?
            .iter()
            .filter_map(RequestAnswer::from_item)
            .collect();
        Ok(ItemRequestDetails { request, items })
    }

    async fn all_with_answers(
        &self,
        requests: Vec<ItemRequest>,
    ) -> Result<Vec<ItemRequestDetails>, Error> {
        let mut details = Vec::with_capacity(requests.len());
        for request in requests {
            details.push(self.with_answers(request).await?);
        }
        Ok(details)
    }
}

#[async_trait]
impl<R, I, U> ItemRequestCommand for ItemRequestService<R, I, U>
where
    R: ItemRequestRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        requestor: UserId,
        description: String,
    ) -> Result<ItemRequestDetails, Error> {
        require_user(self.users.as_ref(), requestor).await?;
        let new_request =
            NewItemRequest::new(description, requestor, self.clock.utc().naive_utc())
                .map_err(Self::map_validation_error)?;
        let request = self
            .requests
            .insert(&new_request)
            .await
            .map_err(map_request_error)?;
        info!(request_id = %request.id, requestor_id = %requestor, "item request created");
        Ok(ItemRequestDetails {
            request,
            items: Vec::new(),
        })
    }
}

#[async_trait]
impl<R, I, U> ItemRequestQuery for ItemRequestService<R, I, U>
where
    R: ItemRequestRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn get(
        &self,
        user: UserId,
        request: ItemRequestId,
    ) -> Result<ItemRequestDetails, Error> {
        require_user(self.users.as_ref(), user).await?;
        let found = self
            .requests
            .find_by_id(request)
            .await
            .map_err(map_request_error)?
            .ok_or_else(|| Error::not_found(format!("Request {request} not found")))?;
        self.with_answers(found).await
    }

    async fn list_own(&self, user: UserId) -> Result<Vec<ItemRequestDetails>, Error> {
        require_user(self.users.as_ref(), user).await?;
        let requests = self
            .requests
            .list_by_requestor(user)
            .await
            .map_err(map_request_error)?;
        self.all_with_answers(requests).await
    }

    async fn list_others(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequestDetails>, Error> {
        require_user(self.users.as_ref(), user).await?;
        let requests = self
            .requests
            .list_excluding_requestor(user, page)
            .await
            .map_err(map_request_error)?;
        self.all_with_answers(requests).await
    }
}
