//! Port for booking persistence.
//!
//! The [`BookingRepository`] trait is the query surface the booking engine,
//! the availability annotator, and the comment gate need. Every returned
//! [`Booking`] carries the summary of its item (id, name, owner), so adapters
//! join bookings with items.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use pagination::PageRequest;

use crate::domain::{Booking, BookingId, BookingStatus, Direction, ItemId, NewBooking, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by booking repository adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
        /// The booking to change does not exist.
        NotFound { id: BookingId } => "booking {id} not found",
        /// The stored status no longer matches the one the change was based on.
        StatusChanged { id: BookingId } => "booking {id} changed status concurrently",
    }
}

/// Port for booking storage and retrieval.
///
/// # Ordering
///
/// Both list operations order by `start` descending, with the booking id
/// descending as a tie breaker, before paging.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking with status `WAITING`.
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError>;

    /// Replace the status `expected` with `status` and return the updated
    /// booking.
    ///
    /// The write only applies while the stored status still equals
    /// `expected`; otherwise it fails with
    /// [`BookingRepositoryError::StatusChanged`]. A missing booking fails
    /// with [`BookingRepositoryError::NotFound`].
    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Booking, BookingRepositoryError>;

    /// Fetch a booking by identifier.
    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Page of bookings made by `booker`.
    async fn list_by_booker(
        &self,
        booker: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Page of bookings of items owned by `owner`.
    async fn list_by_item_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;

    /// Booking of `item` adjacent to `now` in `direction`, skipping bookings
    /// whose status is `excluded`.
    ///
    /// - [`Direction::Last`]: `start < now`, greatest `end` first.
    /// - [`Direction::Next`]: `start > now`, smallest `start` first.
    async fn find_adjacent(
        &self,
        item: ItemId,
        now: NaiveDateTime,
        excluded: BookingStatus,
        direction: Direction,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Any approved booking of `item` by `booker` that ended before `now`.
    async fn find_completed(
        &self,
        booker: UserId,
        item: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, BookingRepositoryError>;
}
