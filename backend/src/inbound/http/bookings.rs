//! Booking HTTP handlers.
//!
//! ```text
//! POST  /bookings                       {"itemId":1,"start":"…","end":"…"}
//! PATCH /bookings/{id}?approved=true
//! GET   /bookings/{id}
//! GET   /bookings?state=ALL&from=0&size=10
//! GET   /bookings/owner?state=ALL&from=0&size=10
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::CreateBookingRequest;
use crate::domain::{Booking, BookingId, ItemId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::sharer::Sharer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, PageQuery, format_local_datetime, parse_approval, parse_local_datetime, parse_state,
};

/// Request payload for placing a booking.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub item_id: i64,
    #[schema(example = "2026-05-01T10:00:00")]
    pub start: String,
    #[schema(example = "2026-05-02T10:00:00")]
    pub end: String,
}

/// Booker reference inside a booking view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookerBody {
    pub id: i64,
}

/// Item reference inside a booking view.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookedItemBody {
    pub id: i64,
    pub name: String,
}

/// Booking as returned by every booking endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    pub id: i64,
    #[schema(example = "2026-05-01T10:00:00")]
    pub start: String,
    #[schema(example = "2026-05-02T10:00:00")]
    pub end: String,
    #[schema(example = "WAITING")]
    pub status: String,
    pub booker: BookerBody,
    pub item: BookedItemBody,
}

impl From<Booking> for BookingBody {
    fn from(value: Booking) -> Self {
        Self {
            id: value.id.as_i64(),
            start: format_local_datetime(value.start),
            end: format_local_datetime(value.end),
            status: value.status.as_str().to_owned(),
            booker: BookerBody {
                id: value.booker.as_i64(),
            },
            item: BookedItemBody {
                id: value.item.id.as_i64(),
                name: value.item.name,
            },
        }
    }
}

fn into_bodies(bookings: Vec<Booking>) -> Vec<BookingBody> {
    bookings.into_iter().map(BookingBody::from).collect()
}

/// Query parameters of the approval endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApprovalQuery {
    /// `true` approves the booking, `false` rejects it.
    pub approved: Option<String>,
}

/// Query parameters of the booking list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    /// ALL, CURRENT, PAST, FUTURE, WAITING or REJECTED.
    #[param(default = "ALL")]
    pub state: Option<String>,
    #[param(minimum = 0, default = 0)]
    pub from: Option<i64>,
    #[param(minimum = 1, default = 10)]
    pub size: Option<i64>,
}

impl BookingListQuery {
    fn page(&self) -> PageQuery {
        PageQuery {
            from: self.from,
            size: self.size,
        }
    }
}

/// Book an item for the acting user.
#[utoipa::path(
    post,
    path = "/bookings",
    request_body = CreateBookingBody,
    responses(
        (status = 200, description = "Booking placed", body = BookingBody),
        (status = 400, description = "Invalid window or unavailable item", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown item or user", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security(("SharerUserId" = []))
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    sharer: Sharer,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<web::Json<BookingBody>> {
    let body = payload.into_inner();
    let request = CreateBookingRequest {
        booker: sharer.id(),
        item: ItemId::new(body.item_id),
        start: parse_local_datetime(&body.start, FieldName::new("start"))?,
        end: parse_local_datetime(&body.end, FieldName::new("end"))?,
    };
    let booking = state.bookings.create(request).await?;
    Ok(web::Json(booking.into()))
}

/// Approve or reject a booking of one of the acting user's items.
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    params(("id" = i64, Path, description = "Booking id"), ApprovalQuery),
    responses(
        (status = 200, description = "Decision applied", body = BookingBody),
        (status = 400, description = "Invalid flag or refused transition", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 403, description = "Caller does not own the item", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema),
        (status = 409, description = "Booking changed since it was read", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "confirmBooking",
    security(("SharerUserId" = []))
)]
#[patch("/bookings/{id}")]
pub async fn confirm_booking(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
    query: web::Query<ApprovalQuery>,
) -> ApiResult<web::Json<BookingBody>> {
    let decision = parse_approval(query.approved.as_deref().unwrap_or_default())?;
    let booking = state
        .bookings
        .confirm_status(sharer.id(), BookingId::new(path.into_inner()), decision)
        .await?;
    Ok(web::Json(booking.into()))
}

/// Bookings placed by the acting user, newest start first.
#[utoipa::path(
    get,
    path = "/bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingBody]),
        (status = 400, description = "Unknown state or invalid page", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listBookerBookings",
    security(("SharerUserId" = []))
)]
#[get("/bookings")]
pub async fn list_booker_bookings(
    state: web::Data<HttpState>,
    sharer: Sharer,
    query: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Vec<BookingBody>>> {
    let filter = parse_state(query.state.as_deref())?;
    let page = query.page().page()?;
    let bookings = state
        .bookings_query
        .list_for_booker(sharer.id(), filter, page)
        .await?;
    Ok(web::Json(into_bodies(bookings)))
}

/// Bookings of items owned by the acting user, newest start first.
#[utoipa::path(
    get,
    path = "/bookings/owner",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Bookings", body = [BookingBody]),
        (status = 400, description = "Unknown state or invalid page", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listOwnerBookings",
    security(("SharerUserId" = []))
)]
#[get("/bookings/owner")]
pub async fn list_owner_bookings(
    state: web::Data<HttpState>,
    sharer: Sharer,
    query: web::Query<BookingListQuery>,
) -> ApiResult<web::Json<Vec<BookingBody>>> {
    let filter = parse_state(query.state.as_deref())?;
    let page = query.page().page()?;
    let bookings = state
        .bookings_query
        .list_for_owner(sharer.id(), filter, page)
        .await?;
    Ok(web::Json(into_bodies(bookings)))
}

/// One booking, visible to its booker and the item owner.
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = i64, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = BookingBody),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 403, description = "Caller is neither booker nor owner", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking",
    security(("SharerUserId" = []))
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<BookingBody>> {
    let booking = state
        .bookings_query
        .get_by_id(sharer.id(), BookingId::new(path.into_inner()))
        .await?;
    Ok(web::Json(booking.into()))
}

/// Register booking routes; `/bookings/owner` precedes `/bookings/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_booking)
        .service(confirm_booking)
        .service(list_booker_bookings)
        .service(list_owner_bookings)
        .service(get_booking);
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
