//! Booking lifecycle: status state machine, booking windows, and the
//! temporal state filter used by list endpoints.
//!
//! All time comparisons take an explicit `now` so the rules stay pure and are
//! evaluated against the injected clock by the booking service.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{BookingId, Item, ItemId, UserId};

/// Persisted status of a booking.
///
/// `Waiting` is the initial status. `Canceled` is terminal and has no
/// transition into it from the booking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Waiting,
    Approved,
    Rejected,
    Canceled,
}

/// Owner decision on a pending booking, parsed from the `approved` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approve,
    Reject,
}

/// Rejected status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("booking is already approved")]
    AlreadyApproved,
    #[error("cannot change status of a {status} booking")]
    Terminal { status: BookingStatus },
}

impl BookingStatus {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Apply an owner decision to the current status.
    ///
    /// Approving an approved booking is refused; rejecting is idempotent.
    /// A rejected booking may still be approved later. Canceled bookings do
    /// not change.
    ///
    /// # Examples
    /// ```
    /// use shareit::domain::{ApprovalDecision, BookingStatus, TransitionError};
    ///
    /// assert_eq!(
    ///     BookingStatus::Waiting.transition(ApprovalDecision::Approve),
    ///     Ok(BookingStatus::Approved)
    /// );
    /// assert_eq!(
    ///     BookingStatus::Approved.transition(ApprovalDecision::Approve),
    ///     Err(TransitionError::AlreadyApproved)
    /// );
    /// ```
    pub fn transition(self, decision: ApprovalDecision) -> Result<Self, TransitionError> {
        match (self, decision) {
            (Self::Canceled, _) => Err(TransitionError::Terminal { status: self }),
            (Self::Approved, ApprovalDecision::Approve) => Err(TransitionError::AlreadyApproved),
            (_, ApprovalDecision::Approve) => Ok(Self::Approved),
            (_, ApprovalDecision::Reject) => Ok(Self::Rejected),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown booking status: {0}")]
pub struct ParseBookingStatusError(pub String);

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(Self::Waiting),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            "CANCELED" => Ok(Self::Canceled),
            other => Err(ParseBookingStatusError(other.to_owned())),
        }
    }
}

/// Error returned when the approval flag is neither `true` nor `false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("approved must be true or false, got {0:?}")]
pub struct ParseApprovalDecisionError(pub String);

impl FromStr for ApprovalDecision {
    type Err = ParseApprovalDecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "true" => Ok(Self::Approve),
            "false" => Ok(Self::Reject),
            other => Err(ParseApprovalDecisionError(other.to_owned())),
        }
    }
}

/// Message reported for any unrecognised state filter.
pub const UNSUPPORTED_STATE_MESSAGE: &str = "Unknown state: UNSUPPORTED_STATUS";

/// Client-requested partition of a booking list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingState {
    #[default]
    All,
    /// `start < now < end`.
    Current,
    /// `end < now`.
    Past,
    /// `now < start`.
    Future,
    Waiting,
    Rejected,
}

/// Error returned for an unrecognised state filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown state: UNSUPPORTED_STATUS")]
pub struct UnsupportedStateError {
    pub requested: String,
}

impl FromStr for BookingState {
    type Err = UnsupportedStateError;

    /// Parse a case-sensitive state name; the empty string means `ALL`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "ALL" => Ok(Self::All),
            "CURRENT" => Ok(Self::Current),
            "PAST" => Ok(Self::Past),
            "FUTURE" => Ok(Self::Future),
            "WAITING" => Ok(Self::Waiting),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(UnsupportedStateError {
                requested: other.to_owned(),
            }),
        }
    }
}

impl BookingState {
    /// Whether `booking` belongs to this partition at `now`.
    pub fn matches(self, booking: &Booking, now: NaiveDateTime) -> bool {
        match self {
            Self::All => true,
            Self::Current => booking.start < now && now < booking.end,
            Self::Past => booking.end < now,
            Self::Future => now < booking.start,
            Self::Waiting => booking.status == BookingStatus::Waiting,
            Self::Rejected => booking.status == BookingStatus::Rejected,
        }
    }

    /// Keep the bookings of a page that belong to this partition.
    ///
    /// The page is filtered as loaded; it is never topped up to its size.
    pub fn filter(self, bookings: Vec<Booking>, now: NaiveDateTime) -> Vec<Booking> {
        if self == Self::All {
            return bookings;
        }
        bookings
            .into_iter()
            .filter(|booking| self.matches(booking, now))
            .collect()
    }
}

/// Booking window validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingWindowError {
    #[error("booking end must be in the future")]
    EndInPast,
    #[error("booking start must be before its end")]
    EndNotAfterStart,
    #[error("booking start must be in the future")]
    StartInPast,
}

/// A validated, future, non-empty booking interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl BookingWindow {
    /// Validate `start < end` with both in the future relative to `now`.
    pub fn new(
        start: NaiveDateTime,
        end: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<Self, BookingWindowError> {
        if end <= now {
            return Err(BookingWindowError::EndInPast);
        }
        if end <= start {
            return Err(BookingWindowError::EndNotAfterStart);
        }
        if start <= now {
            return Err(BookingWindowError::StartInPast);
        }
        Ok(Self { start, end })
    }

    /// Window start.
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Window end.
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Reasons an item cannot be booked by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BookingRuleError {
    #[error("item {item} cannot be booked by its owner")]
    OwnItem { item: ItemId },
    #[error("item {item} is not available for booking")]
    Unavailable { item: ItemId },
}

/// A booking ready to be stored with status [`BookingStatus::Waiting`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    window: BookingWindow,
    item: ItemId,
    booker: UserId,
}

impl NewBooking {
    /// Check the owner exclusion and availability rules for `booker`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, NaiveDate};
    /// use shareit::domain::{
    ///     BookingRuleError, BookingWindow, Item, ItemDraft, ItemId, NewBooking, NewItem, UserId,
    /// };
    ///
    /// let now = NaiveDate::from_ymd_opt(2026, 5, 1)
    ///     .and_then(|d| d.and_hms_opt(12, 0, 0))
    ///     .expect("valid timestamp");
    /// let window = BookingWindow::new(now + Duration::days(1), now + Duration::days(2), now)
    ///     .expect("future window");
    /// let item = Item::from_new(
    ///     ItemId::new(1),
    ///     NewItem::new(ItemDraft {
    ///         owner: UserId::new(1),
    ///         name: "Drill".into(),
    ///         description: "Cordless".into(),
    ///         available: true,
    ///         request_id: None,
    ///     })
    ///     .expect("valid item"),
    /// );
    ///
    /// assert_eq!(
    ///     NewBooking::for_item(&item, UserId::new(1), window),
    ///     Err(BookingRuleError::OwnItem { item: ItemId::new(1) })
    /// );
    /// assert!(NewBooking::for_item(&item, UserId::new(2), window).is_ok());
    /// ```
    pub fn for_item(
        item: &Item,
        booker: UserId,
        window: BookingWindow,
    ) -> Result<Self, BookingRuleError> {
        Self::check_bookable(item, booker)?;
        Ok(Self {
            window,
            item: item.id(),
            booker,
        })
    }

    /// Owner exclusion first, then availability.
    pub fn check_bookable(item: &Item, booker: UserId) -> Result<(), BookingRuleError> {
        if item.is_owned_by(booker) {
            return Err(BookingRuleError::OwnItem { item: item.id() });
        }
        if !item.available() {
            return Err(BookingRuleError::Unavailable { item: item.id() });
        }
        Ok(())
    }

    /// Requested window.
    pub fn window(&self) -> BookingWindow {
        self.window
    }

    /// Booked item.
    pub fn item(&self) -> ItemId {
        self.item
    }

    /// Booking user.
    pub fn booker(&self) -> UserId {
        self.booker
    }

    /// Status assigned on creation.
    pub fn status(&self) -> BookingStatus {
        BookingStatus::Waiting
    }
}

/// Item details carried by the booking read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedItem {
    pub id: ItemId,
    pub name: String,
    pub owner: UserId,
}

/// A stored booking together with the item it reserves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub item: BookedItem,
    pub booker: UserId,
    pub status: BookingStatus,
}

impl Booking {
    /// Owner of the booked item.
    pub fn item_owner(&self) -> UserId {
        self.item.owner
    }

    /// Whether `user` may read this booking: its booker or the item owner.
    pub fn is_visible_to(&self, user: UserId) -> bool {
        self.booker == user || self.item.owner == user
    }

    /// Whether the booking was approved and has ended before `now`.
    pub fn is_completed(&self, now: NaiveDateTime) -> bool {
        self.status == BookingStatus::Approved && self.end < now
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
