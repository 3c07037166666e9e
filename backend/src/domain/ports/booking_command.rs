//! Driving port for booking mutations.
//!
//! HTTP handlers call [`BookingCommand`] to place bookings and to record the
//! owner's decision. Dates arrive already parsed; the window is validated
//! against the service clock.

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::domain::{ApprovalDecision, Booking, BookingId, Error, ItemId, UserId};

/// Request to book an item for a time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateBookingRequest {
    pub booker: UserId,
    pub item: ItemId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Place a booking with status `WAITING`.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the booker or item is missing, or the booker owns
    ///   the item.
    /// - `InvalidRequest` when the item is unavailable or the window is not
    ///   a future, non-empty interval.
    async fn create(&self, request: CreateBookingRequest) -> Result<Booking, Error>;

    /// Apply the item owner's decision to a booking.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the booking or acting user is missing.
    /// - `Forbidden` when the acting user does not own the item.
    /// - `InvalidRequest` when the transition is refused.
    /// - `Conflict` when another decision was stored since the booking was read.
    async fn confirm_status(
        &self,
        owner: UserId,
        booking: BookingId,
        decision: ApprovalDecision,
    ) -> Result<Booking, Error>;
}
