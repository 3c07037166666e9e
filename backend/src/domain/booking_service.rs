//! Booking engine.
//!
//! Implements the booking driving ports: creation with ownership and
//! availability checks, owner approval through the status state machine, and
//! access-controlled, state-filtered listings.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use mockable::Clock;
use pagination::PageRequest;
use serde_json::json;
use tracing::{info, warn};

use super::ports::{
    BookingCommand, BookingQuery, BookingRepository, CreateBookingRequest, ItemRepository,
    UserRepository,
};
use super::store_support::{map_booking_error, require_booking, require_item, require_user};
use super::{
    ApprovalDecision, Booking, BookingId, BookingRuleError, BookingState, BookingWindow,
    BookingWindowError, Error, NewBooking, TransitionError, UserId,
};

/// Booking service implementing [`BookingCommand`] and [`BookingQuery`].
pub struct BookingService<B, I, U> {
    bookings: Arc<B>,
    items: Arc<I>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<B, I, U> Clone for BookingService<B, I, U> {
    fn clone(&self) -> Self {
        Self {
            bookings: Arc::clone(&self.bookings),
            items: Arc::clone(&self.items),
            users: Arc::clone(&self.users),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<B, I, U> BookingService<B, I, U> {
    /// Create a new service with the given repositories and clock.
    pub fn new(bookings: Arc<B>, items: Arc<I>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            bookings,
            items,
            users,
            clock,
        }
    }

    fn now(&self) -> NaiveDateTime {
        self.clock.utc().naive_utc()
    }
}

impl<B, I, U> BookingService<B, I, U>
where
    B: BookingRepository,
    I: ItemRepository,
    U: UserRepository,
{
    fn map_rule_error(error: BookingRuleError) -> Error {
        match error {
            // Self-booking is reported as a missing item.
            BookingRuleError::OwnItem { item } => {
                Error::not_found(format!("Item {item} not found for its owner"))
            }
            BookingRuleError::Unavailable { .. } => Error::invalid_request(error.to_string())
                .with_details(json!({ "field": "itemId", "code": "item_unavailable" })),
        }
    }

    fn map_window_error(error: BookingWindowError) -> Error {
        let (field, code) = match error {
            BookingWindowError::EndInPast => ("end", "end_in_past"),
            BookingWindowError::EndNotAfterStart => ("end", "end_not_after_start"),
            BookingWindowError::StartInPast => ("start", "start_in_past"),
        };
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": field, "code": code }))
    }

    fn map_transition_error(error: TransitionError) -> Error {
        let code = match error {
            TransitionError::AlreadyApproved => "already_approved",
            TransitionError::Terminal { .. } => "terminal_status",
        };
        Error::invalid_request(error.to_string()).with_details(json!({ "code": code }))
    }

    async fn list(
        &self,
        user: UserId,
        state: BookingState,
        page: PageRequest,
        as_owner: bool,
    ) -> Result<Vec<Booking>, Error> {
        require_user(self.users.as_ref(), user).await?;
        let bookings = if as_owner {
            self.bookings.list_by_item_owner(user, page).await
        } else {
            self.bookings.list_by_booker(user, page).await
        }
        .map_err(map_booking_error)?;
        Ok(state.filter(bookings, self.now()))
    }
}

#[async_trait]
impl<B, I, U> BookingCommand for BookingService<B, I, U>
where
    B: BookingRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn create(&self, request: CreateBookingRequest) -> Result<Booking, Error> {
        let booker = require_user(self.users.as_ref(), request.booker).await?;
        let item = require_item(self.items.as_ref(), request.item).await?;
        NewBooking::check_bookable(&item, booker.id()).map_err(Self::map_rule_error)?;

        let window = BookingWindow::new(request.start, request.end, self.now())
            .map_err(Self::map_window_error)?;
        let new_booking =
            NewBooking::for_item(&item, booker.id(), window).map_err(Self::map_rule_error)?;

        let booking = self
            .bookings
            .insert(&new_booking)
            .await
            .map_err(map_booking_error)?;
        info!(
            booking_id = %booking.id,
            item_id = %booking.item.id,
            booker_id = %booking.booker,
            "booking created"
        );
        Ok(booking)
    }

    async fn confirm_status(
        &self,
        owner: UserId,
        booking: BookingId,
        decision: ApprovalDecision,
    ) -> Result<Booking, Error> {
        let current = require_booking(self.bookings.as_ref(), booking).await?;
        require_user(self.users.as_ref(), owner).await?;
        if current.item_owner() != owner {
            warn!(booking_id = %booking, user_id = %owner, "status change by non-owner refused");
            return Err(Error::forbidden(format!(
                "User {owner} does not own the item of booking {booking}"
            )));
        }

        let status = current
            .status
            .transition(decision)
            .map_err(Self::map_transition_error)?;
        let updated = self
            .bookings
            .update_status(booking, current.status, status)
            .await
            .map_err(map_booking_error)?;
        info!(booking_id = %booking, %status, "booking status changed");
        Ok(updated)
    }
}

#[async_trait]
impl<B, I, U> BookingQuery for BookingService<B, I, U>
where
    B: BookingRepository,
    I: ItemRepository,
    U: UserRepository,
{
    async fn get_by_id(&self, user: UserId, booking: BookingId) -> Result<Booking, Error> {
        let found = require_booking(self.bookings.as_ref(), booking).await?;
        if !found.is_visible_to(user) {
            warn!(booking_id = %booking, user_id = %user, "booking read by outsider refused");
            return Err(Error::forbidden(format!(
                "User {user} may not view booking {booking}"
            )));
        }
        Ok(found)
    }

    async fn list_for_booker(
        &self,
        user: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> Result<Vec<Booking>, Error> {
        self.list(user, state, page, false).await
    }

    async fn list_for_owner(
        &self,
        user: UserId,
        state: BookingState,
        page: PageRequest,
    ) -> Result<Vec<Booking>, Error> {
        self.list(user, state, page, true).await
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
