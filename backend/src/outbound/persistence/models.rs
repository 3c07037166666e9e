//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer. Each row converts into its
//! domain counterpart through `into_domain`, which is the only place stored
//! values are trusted without revalidation.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::schema::{bookings, comments, items, requests, users};
use crate::domain::{
    BookedItem, Booking, BookingId, BookingStatus, Comment, CommentId, Item, ItemDraft, ItemId,
    ItemRequest, ItemRequestId, User, UserId,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> User {
        User::from_parts(UserId::new(self.id), self.name, self.email)
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserValues<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

impl ItemRow {
    pub(crate) fn into_domain(self) -> Item {
        Item::from_parts(
            ItemId::new(self.id),
            ItemDraft {
                owner: UserId::new(self.owner_id),
                name: self.name,
                description: self.description,
                available: self.is_available,
                request_id: self.request_id.map(ItemRequestId::new),
            },
        )
    }
}

/// Insertable item values; `request_id` is only written on insert.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub is_available: bool,
    pub owner_id: i64,
    pub request_id: Option<i64>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
pub(crate) struct ItemUpdate<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub is_available: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub booker_id: i64,
    pub status: String,
}

/// Item columns joined onto every booking.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookedItemRow {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
}

/// Assemble a domain booking from a joined row.
///
/// Returns the unparsable status text when the stored value is not a known
/// booking status.
pub(crate) fn booking_from_rows(
    (booking, item): (BookingRow, BookedItemRow),
) -> Result<Booking, String> {
    let status = booking
        .status
        .parse::<BookingStatus>()
        .map_err(|_| booking.status.clone())?;
    Ok(Booking {
        id: BookingId::new(booking.id),
        start: booking.start_date,
        end: booking.end_date,
        item: BookedItem {
            id: ItemId::new(item.id),
            name: item.name,
            owner: UserId::new(item.owner_id),
        },
        booker: UserId::new(booking.booker_id),
        status,
    })
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub item_id: i64,
    pub booker_id: i64,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommentRow {
    pub id: i64,
    pub text: String,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}

impl CommentRow {
    pub(crate) fn into_domain(self, author_name: String) -> Comment {
        Comment {
            id: CommentId::new(self.id),
            text: self.text,
            item: ItemId::new(self.item_id),
            author: UserId::new(self.author_id),
            author_name,
            created: self.created,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comments)]
pub(crate) struct NewCommentRow<'a> {
    pub text: &'a str,
    pub item_id: i64,
    pub author_id: i64,
    pub created: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RequestRow {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

impl RequestRow {
    pub(crate) fn into_domain(self) -> ItemRequest {
        ItemRequest {
            id: ItemRequestId::new(self.id),
            description: self.description,
            requestor: UserId::new(self.requestor_id),
            created: self.created,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = requests)]
pub(crate) struct NewRequestRow<'a> {
    pub description: &'a str,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 2)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn rows(status: &str) -> (BookingRow, BookedItemRow) {
        (
            BookingRow {
                id: 4,
                start_date: at(9),
                end_date: at(11),
                booker_id: 2,
                status: status.to_owned(),
            },
            BookedItemRow {
                id: 7,
                name: "Drill".to_owned(),
                owner_id: 1,
            },
        )
    }

    #[rstest]
    fn joined_rows_become_a_booking() {
        let booking = booking_from_rows(rows("APPROVED")).expect("known status");

        assert_eq!(booking.status, BookingStatus::Approved);
        assert_eq!(booking.item.name, "Drill");
        assert_eq!(booking.item_owner(), UserId::new(1));
        assert_eq!(booking.booker, UserId::new(2));
    }

    #[rstest]
    fn unknown_status_is_reported() {
        assert_eq!(booking_from_rows(rows("LOST")), Err("LOST".to_owned()));
    }

    #[rstest]
    fn item_row_keeps_request_link() {
        let item = ItemRow {
            id: 3,
            name: "Ladder".to_owned(),
            description: "Aluminium".to_owned(),
            is_available: false,
            owner_id: 5,
            request_id: Some(9),
        }
        .into_domain();

        assert_eq!(item.request_id(), Some(ItemRequestId::new(9)));
        assert!(!item.available());
    }
}
