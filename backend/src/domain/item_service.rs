//! Catalog service.
//!
//! Implements the item driving ports. Items shown to their owner are
//! annotated with the last and next booking; comments pass through the
//! completed-booking gate.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockable::Clock;
use pagination::PageRequest;
use serde_json::json;
use tracing::{info, warn};

use super::ports::{
    BookingRepository, CommentRepository, ItemCommand, ItemQuery, ItemRepository,
    ItemRequestRepository, UserRepository,
};
use super::store_support::{
    map_booking_error, map_comment_error, map_item_error, map_request_error, require_item,
    require_user,
};
use super::{
    AvailabilityAnnotator, Comment, CommentText, Error, Item, ItemDetails, ItemId, ItemPatch,
    ItemValidationError, NewComment, NewItem, UserId,
};

/// Repositories the catalog service reads and writes.
pub struct ItemStores<I, B, C, U, R> {
    pub items: Arc<I>,
    pub bookings: Arc<B>,
    pub comments: Arc<C>,
    pub users: Arc<U>,
    pub requests: Arc<R>,
}

/// Catalog service implementing [`ItemCommand`] and [`ItemQuery`].
pub struct ItemService<I, B, C, U, R> {
    items: Arc<I>,
    bookings: Arc<B>,
    comments: Arc<C>,
    users: Arc<U>,
    requests: Arc<R>,
    annotator: AvailabilityAnnotator<B>,
    clock: Arc<dyn Clock>,
}

impl<I, B, C, U, R> ItemService<I, B, C, U, R>
where
    B: BookingRepository,
{
    /// Create a new service over the given stores and clock.
    pub fn new(stores: ItemStores<I, B, C, U, R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            annotator: AvailabilityAnnotator::new(Arc::clone(&stores.bookings)),
            items: stores.items,
            bookings: stores.bookings,
            comments: stores.comments,
            users: stores.users,
            requests: stores.requests,
            clock,
        }
    }
}

impl<I, B, C, U, R> ItemService<I, B, C, U, R>
where
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
    U: UserRepository,
    R: ItemRequestRepository,
{
    fn now(&self) -> NaiveDateTime {
        self.clock.utc().naive_utc()
    }

    async fn details(
        &self,
        item: Item,
        viewer: UserId,
        now: NaiveDateTime,
    ) -> Result<ItemDetails, Error> {
        let availability = self.annotator.annotate(&item, viewer, now).await?;
        let comments = self
            .comments
            .list_by_item(item.id())
            .await
            .map_err(map_comment_error)?;
        Ok(ItemDetails {
            item,
            availability,
            comments,
        })
    }
}

/// Map item validation failures onto field-tagged request errors.
pub(crate) fn map_item_validation_error(error: ItemValidationError) -> Error {
    let (field, code) = match error {
        ItemValidationError::EmptyName => ("name", "empty_name"),
        ItemValidationError::NameTooLong { .. } => ("name", "name_too_long"),
        ItemValidationError::EmptyDescription => ("description", "empty_description"),
        ItemValidationError::DescriptionTooLong { .. } => ("description", "description_too_long"),
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field, "code": code }))
}

#[async_trait]
impl<I, B, C, U, R> ItemCommand for ItemService<I, B, C, U, R>
where
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
    U: UserRepository,
    R: ItemRequestRepository,
{
    async fn create(&self, item: NewItem) -> Result<Item, Error> {
        require_user(self.users.as_ref(), item.owner()).await?;
        if let Some(request_id) = item.request_id() {
            self.requests
                .find_by_id(request_id)
                .await
                .map_err(map_request_error)?
                .ok_or_else(|| Error::not_found(format!("Request {request_id} not found")))?;
        }

        let created = self.items.insert(&item).await.map_err(map_item_error)?;
        info!(item_id = %created.id(), owner_id = %created.owner(), "item created");
        Ok(created)
    }

    async fn update(&self, owner: UserId, item: ItemId, patch: ItemPatch) -> Result<Item, Error> {
        require_user(self.users.as_ref(), owner).await?;
        let current = require_item(self.items.as_ref(), item).await?;
        if !current.is_owned_by(owner) {
            warn!(item_id = %item, user_id = %owner, "item update by non-owner refused");
            return Err(Error::forbidden(format!(
                "User {owner} does not have access to item {item}"
            )));
        }

        let patched = current.apply(patch).map_err(map_item_validation_error)?;
        let updated = self.items.update(&patched).await.map_err(map_item_error)?;
        info!(item_id = %item, "item updated");
        Ok(updated)
    }

    async fn add_comment(
        &self,
        author: UserId,
        item: ItemId,
        text: CommentText,
    ) -> Result<Comment, Error> {
        require_user(self.users.as_ref(), author).await?;
        require_item(self.items.as_ref(), item).await?;

        let now = self.now();
        self.bookings
            .find_completed(author, item, now)
            .await
            .map_err(map_booking_error)?
            .ok_or_else(|| {
                Error::invalid_request("Booking not found")
                    .with_details(json!({ "code": "no_completed_booking" }))
            })?;

        let comment = self
            .comments
            .insert(&NewComment {
                text,
                item,
                author,
                created: now,
            })
            .await
            .map_err(map_comment_error)?;
        info!(comment_id = %comment.id, item_id = %item, author_id = %author, "comment added");
        Ok(comment)
    }
}

#[async_trait]
impl<I, B, C, U, R> ItemQuery for ItemService<I, B, C, U, R>
where
    I: ItemRepository,
    B: BookingRepository,
    C: CommentRepository,
    U: UserRepository,
    R: ItemRequestRepository,
{
    async fn get(&self, viewer: UserId, item: ItemId) -> Result<ItemDetails, Error> {
        require_user(self.users.as_ref(), viewer).await?;
        let found = require_item(self.items.as_ref(), item).await?;
        self.details(found, viewer, self.now()).await
    }

    async fn list_owned(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemDetails>, Error> {
        require_user(self.users.as_ref(), owner).await?;
        let items = self
            .items
            .list_by_owner(owner, page)
            .await
            .map_err(map_item_error)?;

        let now = self.now();
        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(self.details(item, owner, now).await?);
        }
        Ok(details)
    }

    async fn search(
        &self,
        viewer: UserId,
        text: String,
        page: PageRequest,
    ) -> Result<Vec<Item>, Error> {
        require_user(self.users.as_ref(), viewer).await?;
        if text.is_empty() {
            return Ok(Vec::new());
        }
        self.items
            .search(&text, page)
            .await
            .map_err(map_item_error)
    }
}

#[cfg(test)]
#[path = "item_service_tests.rs"]
mod tests;
