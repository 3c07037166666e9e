//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities of the sharing marketplace and
//! the services implementing its driving ports. Time-dependent rules take an
//! explicit `now` so they stay pure; services obtain it from an injected
//! [`mockable::Clock`].
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - Booking, BookingStatus, BookingState — booking lifecycle.
//! - Item, ItemDetails, ItemAvailability — catalog entries and their views.
//! - Comment, ItemRequest, User — supporting aggregates.

pub mod availability;
pub mod booking;
mod booking_service;
pub mod comment;
pub mod error;
pub mod ids;
pub mod item;
pub mod item_request;
mod item_request_service;
mod item_service;
pub mod ports;
mod store_support;
mod trace_id;
pub mod user;
mod user_service;

pub use self::availability::{
    AvailabilityAnnotator, BookingSummary, Direction, ItemAvailability,
};
pub use self::booking::{
    ApprovalDecision, BookedItem, Booking, BookingRuleError, BookingState, BookingStatus,
    BookingWindow, BookingWindowError, NewBooking, ParseApprovalDecisionError,
    ParseBookingStatusError, TransitionError, UNSUPPORTED_STATE_MESSAGE, UnsupportedStateError,
};
pub use self::booking_service::BookingService;
pub use self::comment::{
    COMMENT_TEXT_MAX, Comment, CommentText, CommentValidationError, NewComment,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{BookingId, CommentId, ItemId, ItemRequestId, UserId};
pub use self::item::{
    ITEM_DESCRIPTION_MAX, ITEM_NAME_MAX, Item, ItemDetails, ItemDraft, ItemPatch,
    ItemValidationError, NewItem,
};
pub use self::item_request::{
    ItemRequest, ItemRequestDetails, ItemRequestValidationError, NewItemRequest,
    REQUEST_DESCRIPTION_MAX, RequestAnswer,
};
pub use self::item_request_service::ItemRequestService;
pub use self::item_service::{ItemService, ItemStores};
pub(crate) use self::item_service::map_item_validation_error;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EMAIL_MAX, NewUser, USER_NAME_MAX, User, UserPatch, UserValidationError};
pub use self::user_service::UserService;
pub(crate) use self::user_service::map_user_validation_error;

