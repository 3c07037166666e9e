//! Driving port for booking reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Booking, BookingId, BookingState, Error, UserId};

/// Access-controlled booking queries.
///
/// List operations page first and filter by [`BookingState`] afterwards, so
/// a filtered page may hold fewer than `page.size()` bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Fetch one booking visible to `user` as booker or item owner.
    async fn get_by_id(&self, user: UserId, booking: BookingId) -> Result<Booking, Error>;

    /// Bookings made by `user`, newest start first.
    async fn list_for_booker(
        &self,
        user: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> Result<Vec<Booking>, Error>;

    /// Bookings of items owned by `user`, newest start first.
    async fn list_for_owner(
        &self,
        user: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> Result<Vec<Booking>, Error>;
}
