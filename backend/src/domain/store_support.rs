//! Shared translation of driven-port failures into domain errors, plus the
//! "must exist" lookups every service starts with.

use serde_json::json;
use tracing::debug;

use super::ports::{
    BookingRepository, BookingRepositoryError, CommentRepositoryError, ItemRepository,
    ItemRepositoryError, ItemRequestRepositoryError, UserPersistenceError, UserRepository,
};
use super::{Booking, BookingId, Error, Item, ItemId, User, UserId};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
        UserPersistenceError::NotFound { id } => user_not_found(id),
    }
}

pub(crate) fn map_item_error(error: ItemRepositoryError) -> Error {
    match error {
        ItemRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("item repository unavailable: {message}"))
        }
        ItemRepositoryError::Query { message } => {
            Error::internal(format!("item repository error: {message}"))
        }
        ItemRepositoryError::NotFound { id } => item_not_found(id),
    }
}

pub(crate) fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingRepositoryError::NotFound { id } => booking_not_found(id),
        BookingRepositoryError::StatusChanged { id } => Error::conflict(format!(
            "Booking {id} was updated concurrently; reload and retry"
        ))
        .with_details(json!({ "code": "status_changed" })),
    }
}

pub(crate) fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment repository unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment repository error: {message}"))
        }
    }
}

pub(crate) fn map_request_error(error: ItemRequestRepositoryError) -> Error {
    match error {
        ItemRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("request repository unavailable: {message}"))
        }
        ItemRequestRepositoryError::Query { message } => {
            Error::internal(format!("request repository error: {message}"))
        }
    }
}

pub(crate) fn user_not_found(id: UserId) -> Error {
    Error::not_found(format!("User {id} not found"))
}

pub(crate) fn item_not_found(id: ItemId) -> Error {
    Error::not_found(format!("Item {id} not found"))
}

pub(crate) fn booking_not_found(id: BookingId) -> Error {
    Error::not_found(format!("Booking {id} not found"))
}

pub(crate) async fn require_user<U>(users: &U, id: UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(id)
        .await
        .map_err(|error| {
            debug!(user_id = %id, %error, "user lookup failed");
            map_user_error(error)
        })?
        .ok_or_else(|| user_not_found(id))
}

pub(crate) async fn require_item<I>(items: &I, id: ItemId) -> Result<Item, Error>
where
    I: ItemRepository + ?Sized,
{
    items
        .find_by_id(id)
        .await
        .map_err(|error| {
            debug!(item_id = %id, %error, "item lookup failed");
            map_item_error(error)
        })?
        .ok_or_else(|| item_not_found(id))
}

pub(crate) async fn require_booking<B>(bookings: &B, id: BookingId) -> Result<Booking, Error>
where
    B: BookingRepository + ?Sized,
{
    bookings
        .find_by_id(id)
        .await
        .map_err(|error| {
            debug!(booking_id = %id, %error, "booking lookup failed");
            map_booking_error(error)
        })?
        .ok_or_else(|| booking_not_found(id))
}
