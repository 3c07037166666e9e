//! Catalog items offered for sharing.

use serde::{Deserialize, Serialize};

use super::{Comment, ItemAvailability, ItemId, ItemRequestId, UserId};

/// Maximum allowed length for an item name.
pub const ITEM_NAME_MAX: usize = 256;
/// Maximum allowed length for an item description.
pub const ITEM_DESCRIPTION_MAX: usize = 512;

/// Validation errors returned when building or patching items.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
}

fn validate_name(name: String) -> Result<String, ItemValidationError> {
    if name.trim().is_empty() {
        return Err(ItemValidationError::EmptyName);
    }
    if name.chars().count() > ITEM_NAME_MAX {
        return Err(ItemValidationError::NameTooLong { max: ITEM_NAME_MAX });
    }
    Ok(name)
}

fn validate_description(description: String) -> Result<String, ItemValidationError> {
    if description.trim().is_empty() {
        return Err(ItemValidationError::EmptyDescription);
    }
    if description.chars().count() > ITEM_DESCRIPTION_MAX {
        return Err(ItemValidationError::DescriptionTooLong {
            max: ITEM_DESCRIPTION_MAX,
        });
    }
    Ok(description)
}

/// Input payload for [`NewItem::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub owner: UserId,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<ItemRequestId>,
}

/// Validated item awaiting a store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    owner: UserId,
    name: String,
    description: String,
    available: bool,
    request_id: Option<ItemRequestId>,
}

impl NewItem {
    /// Validate an item draft.
    pub fn new(draft: ItemDraft) -> Result<Self, ItemValidationError> {
        Ok(Self {
            owner: draft.owner,
            name: validate_name(draft.name)?,
            description: validate_description(draft.description)?,
            available: draft.available,
            request_id: draft.request_id,
        })
    }

    /// Owner of the item.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the item accepts new bookings.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Request this item answers, if any.
    pub fn request_id(&self) -> Option<ItemRequestId> {
        self.request_id
    }
}

/// Partial update of an item; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// An item listed by its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    owner: UserId,
    name: String,
    description: String,
    available: bool,
    request_id: Option<ItemRequestId>,
}

impl Item {
    /// Attach a store-assigned identifier to a validated item.
    pub fn from_new(id: ItemId, item: NewItem) -> Self {
        Self {
            id,
            owner: item.owner,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
        }
    }

    /// Rehydrate an item from trusted storage without revalidating it.
    pub fn from_parts(id: ItemId, parts: ItemDraft) -> Self {
        Self {
            id,
            owner: parts.owner,
            name: parts.name,
            description: parts.description,
            available: parts.available,
            request_id: parts.request_id,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Owner of the item.
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Whether `user` owns this item.
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner == user
    }

    /// Item name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Item description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the item accepts new bookings.
    pub fn available(&self) -> bool {
        self.available
    }

    /// Request this item answers, if any.
    pub fn request_id(&self) -> Option<ItemRequestId> {
        self.request_id
    }

    /// Apply a partial update, validating only the supplied fields.
    pub fn apply(mut self, patch: ItemPatch) -> Result<Self, ItemValidationError> {
        if let Some(name) = patch.name {
            self.name = validate_name(name)?;
        }
        if let Some(description) = patch.description {
            self.description = validate_description(description)?;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        Ok(self)
    }
}

/// Item read model: comments, plus booking annotations for the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    #[serde(flatten)]
    pub availability: ItemAvailability,
    pub comments: Vec<Comment>,
}
