//! Availability annotation of items: the last and next booking around now.
//!
//! Only the owner of an item sees these annotations. Rejected bookings never
//! count, and the boundary comparisons on `start` are strict, so a booking
//! starting exactly at `now` is neither last nor next.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ports::BookingRepository;
use super::store_support::map_booking_error;
use super::{Booking, BookingId, BookingStatus, Error, Item, UserId};

/// Which neighbour of `now` to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Started before now; greatest `end` wins.
    Last,
    /// Starts after now; smallest `start` wins.
    Next,
}

impl Direction {
    /// Pick the adjacent booking from `bookings` of a single item.
    ///
    /// Store adapters without a query language use this directly; SQL
    /// adapters express the same ordering in their query.
    pub fn select<'a, I>(
        self,
        bookings: I,
        now: NaiveDateTime,
        excluded: BookingStatus,
    ) -> Option<&'a Booking>
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let candidates = bookings
            .into_iter()
            .filter(move |booking| booking.status != excluded);
        match self {
            Self::Last => candidates
                .filter(|booking| booking.start < now)
                .max_by_key(|booking| (booking.end, booking.id)),
            Self::Next => candidates
                .filter(|booking| booking.start > now)
                .min_by_key(|booking| (booking.start, booking.id)),
        }
    }
}

/// Compact reference to a booking shown on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummary {
    pub id: BookingId,
    pub booker_id: UserId,
}

impl From<&Booking> for BookingSummary {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker,
        }
    }
}

/// Last and next booking of an item, both optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemAvailability {
    pub last_booking: Option<BookingSummary>,
    pub next_booking: Option<BookingSummary>,
}

/// Computes [`ItemAvailability`] for items shown to their owner.
pub struct AvailabilityAnnotator<B> {
    bookings: Arc<B>,
}

impl<B> Clone for AvailabilityAnnotator<B> {
    fn clone(&self) -> Self {
        Self {
            bookings: Arc::clone(&self.bookings),
        }
    }
}

impl<B> AvailabilityAnnotator<B>
where
    B: BookingRepository,
{
    /// Create an annotator reading from the booking store.
    pub fn new(bookings: Arc<B>) -> Self {
        Self { bookings }
    }

    /// Annotate `item` for `viewer`.
    ///
    /// Viewers other than the owner receive empty annotations without any
    /// store access.
    pub async fn annotate(
        &self,
        item: &Item,
        viewer: UserId,
        now: NaiveDateTime,
    ) -> Result<ItemAvailability, Error> {
        if !item.is_owned_by(viewer) {
            return Ok(ItemAvailability::default());
        }
        let last = self.adjacent(item, now, Direction::Last).await?;
        let next = self.adjacent(item, now, Direction::Next).await?;
        Ok(ItemAvailability {
            last_booking: last.as_ref().map(BookingSummary::from),
            next_booking: next.as_ref().map(BookingSummary::from),
        })
    }

    async fn adjacent(
        &self,
        item: &Item,
        now: NaiveDateTime,
        direction: Direction,
    ) -> Result<Option<Booking>, Error> {
        self.bookings
            .find_adjacent(item.id(), now, BookingStatus::Rejected, direction)
            .await
            .map_err(|error| {
                debug!(item_id = %item.id(), ?direction, %error, "adjacent booking lookup failed");
                map_booking_error(error)
            })
    }
}
