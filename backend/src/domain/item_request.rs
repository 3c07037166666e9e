//! Requests for items that are not yet in the catalog.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Item, ItemId, ItemRequestId, UserId};

/// Maximum allowed length for a request description.
pub const REQUEST_DESCRIPTION_MAX: usize = 1024;

/// Validation errors for item requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemRequestValidationError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

/// A validated request awaiting storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    description: String,
    requestor: UserId,
    created: NaiveDateTime,
}

impl NewItemRequest {
    /// Validate the description of a request made by `requestor` at `created`.
    pub fn new(
        description: impl Into<String>,
        requestor: UserId,
        created: NaiveDateTime,
    ) -> Result<Self, ItemRequestValidationError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(ItemRequestValidationError::EmptyDescription);
        }
        if description.chars().count() > REQUEST_DESCRIPTION_MAX {
            return Err(ItemRequestValidationError::DescriptionTooLong {
                max: REQUEST_DESCRIPTION_MAX,
            });
        }
        Ok(Self {
            description,
            requestor,
            created,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn requestor(&self) -> UserId {
        self.requestor
    }

    pub fn created(&self) -> NaiveDateTime {
        self.created
    }
}

/// A stored request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequest {
    pub id: ItemRequestId,
    pub description: String,
    pub requestor: UserId,
    pub created: NaiveDateTime,
}

impl ItemRequest {
    /// Attach a store-assigned identifier.
    pub fn from_new(id: ItemRequestId, request: NewItemRequest) -> Self {
        Self {
            id,
            description: request.description,
            requestor: request.requestor,
            created: request.created,
        }
    }
}

/// An item created in answer to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAnswer {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: UserId,
    pub request_id: ItemRequestId,
}

impl RequestAnswer {
    /// Summarise an item for its request; `None` when it answers no request.
    pub fn from_item(item: &Item) -> Option<Self> {
        item.request_id().map(|request_id| Self {
            item_id: item.id(),
            name: item.name().to_owned(),
            description: item.description().to_owned(),
            available: item.available(),
            owner_id: item.owner(),
            request_id,
        })
    }
}

/// A request together with the items answering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestDetails {
    #[serde(flatten)]
    pub request: ItemRequest,
    pub items: Vec<RequestAnswer>,
}
