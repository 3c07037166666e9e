//! PostgreSQL-backed `BookingRepository` adapter.
//!
//! Every query joins `items` so returned bookings carry the item name and
//! owner. Writes reload the joined row inside the same transaction, and status
//! changes only apply while the stored status is the one the caller read.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{BookingRepository, BookingRepositoryError};
use crate::domain::{Booking, BookingId, BookingStatus, Direction, ItemId, NewBooking, UserId};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure};
use super::models::{BookedItemRow, BookingRow, NewBookingRow, booking_from_rows};
use super::paging::{limit, offset};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, items};

type JoinedRow = (BookingRow, BookedItemRow);

/// Diesel-backed implementation of [`BookingRepository`].
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> BookingRepositoryError {
    map_pool_failure(error, BookingRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> BookingRepositoryError {
    map_diesel_failure(
        error,
        BookingRepositoryError::query,
        BookingRepositoryError::connection,
    )
}

fn to_booking(row: JoinedRow) -> Result<Booking, BookingRepositoryError> {
    booking_from_rows(row).map_err(|status| {
        BookingRepositoryError::query(format!("stored booking has unknown status {status}"))
    })
}

fn to_bookings(rows: Vec<JoinedRow>) -> Result<Vec<Booking>, BookingRepositoryError> {
    rows.into_iter().map(to_booking).collect()
}

fn to_optional_booking(row: Option<JoinedRow>) -> Result<Option<Booking>, BookingRepositoryError> {
    row.map(to_booking).transpose()
}

async fn load_row(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<JoinedRow>, DieselError> {
    bookings::table
        .inner_join(items::table)
        .filter(bookings::id.eq(id))
        .select((BookingRow::as_select(), BookedItemRow::as_select()))
        .first::<JoinedRow>(conn)
        .await
        .optional()
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn insert(&self, booking: &NewBooking) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewBookingRow {
            start_date: booking.window().start(),
            end_date: booking.window().end(),
            item_id: booking.item().as_i64(),
            booker_id: booking.booker().as_i64(),
            status: booking.status().as_str(),
        };
        let stored = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let id: i64 = diesel::insert_into(bookings::table)
                        .values(row)
                        .returning(bookings::id)
                        .get_result(conn)
                        .await?;
                    load_row(conn, id).await?.ok_or(DieselError::NotFound)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        to_booking(stored)
    }

    async fn update_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        status: BookingStatus,
    ) -> Result<Booking, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_id = id.as_i64();
        let (updated, row) = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let updated = diesel::update(
                        bookings::table
                            .find(raw_id)
                            .filter(bookings::status.eq(expected.as_str())),
                    )
                    .set(bookings::status.eq(status.as_str()))
                    .execute(conn)
                    .await?;
                    let row = load_row(conn, raw_id).await?;
                    Ok((updated, row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match (updated, row) {
            (_, None) => Err(BookingRepositoryError::not_found(id)),
            (0, Some(_)) => Err(BookingRepositoryError::status_changed(id)),
            (_, Some(row)) => to_booking(row),
        }
    }

    async fn find_by_id(&self, id: BookingId) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_row(&mut conn, id.as_i64())
            .await
            .map_err(map_diesel_error)?;
        to_optional_booking(row)
    }

    async fn list_by_booker(
        &self,
        booker: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bookings::table
            .inner_join(items::table)
            .filter(bookings::booker_id.eq(booker.as_i64()))
            .order((bookings::start_date.desc(), bookings::id.desc()))
            .offset(offset(page))
            .limit(limit(page))
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_bookings(rows)
    }

    async fn list_by_item_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = bookings::table
            .inner_join(items::table)
            .filter(items::owner_id.eq(owner.as_i64()))
            .order((bookings::start_date.desc(), bookings::id.desc()))
            .offset(offset(page))
            .limit(limit(page))
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .load::<JoinedRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_bookings(rows)
    }

    async fn find_adjacent(
        &self,
        item: ItemId,
        now: NaiveDateTime,
        excluded: BookingStatus,
        direction: Direction,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let candidates = bookings::table
            .inner_join(items::table)
            .filter(bookings::item_id.eq(item.as_i64()))
            .filter(bookings::status.ne(excluded.as_str()))
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .into_boxed();

        let query = match direction {
            Direction::Last => candidates
                .filter(bookings::start_date.lt(now))
                .order((bookings::end_date.desc(), bookings::id.desc())),
            Direction::Next => candidates
                .filter(bookings::start_date.gt(now))
                .order((bookings::start_date.asc(), bookings::id.asc())),
        };

        let row = query
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        to_optional_booking(row)
    }

    async fn find_completed(
        &self,
        booker: UserId,
        item: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = bookings::table
            .inner_join(items::table)
            .filter(bookings::booker_id.eq(booker.as_i64()))
            .filter(bookings::item_id.eq(item.as_i64()))
            .filter(bookings::status.eq(BookingStatus::Approved.as_str()))
            .filter(bookings::end_date.lt(now))
            .order(bookings::end_date.desc())
            .select((BookingRow::as_select(), BookedItemRow::as_select()))
            .first::<JoinedRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        to_optional_booking(row)
    }
}
