//! Shared parsing and formatting of request and response fields for HTTP
//! handlers.
//!
//! Every failure becomes an `invalid_request` error whose details name the
//! offending field and a stable code.

use chrono::NaiveDateTime;
use pagination::{DEFAULT_FROM, DEFAULT_SIZE, PageRequest, PageRequestError};
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::{ApprovalDecision, BookingState, Error, UNSUPPORTED_STATE_MESSAGE};

// `%.f` prints nothing for whole seconds.
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidationCode {
    InvalidTimestamp,
    InvalidPage,
    UnsupportedState,
    InvalidApproval,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidPage => "invalid_page",
            Self::UnsupportedState => "unsupported_state",
            Self::InvalidApproval => "invalid_approval",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }
}

fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
    value: &str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.0,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse an ISO-8601 local date-time such as `2026-05-01T10:00:00`.
///
/// Fractional seconds are accepted; offsets are not.
pub(crate) fn parse_local_datetime(value: &str, field: FieldName) -> Result<NaiveDateTime, Error> {
    value.parse::<NaiveDateTime>().map_err(|_| {
        field_error(
            field,
            ValidationCode::InvalidTimestamp,
            format!("{} must be a local date-time like 2026-05-01T10:00:00", field.0),
            value,
        )
    })
}

/// Render a timestamp in the same local format accepted by
/// [`parse_local_datetime`].
pub(crate) fn format_local_datetime(value: NaiveDateTime) -> String {
    value.format(LOCAL_DATETIME_FORMAT).to_string()
}

/// Parse the `state` query parameter; absent means `ALL`.
pub(crate) fn parse_state(value: Option<&str>) -> Result<BookingState, Error> {
    let raw = value.unwrap_or_default();
    raw.parse::<BookingState>().map_err(|_| {
        field_error(
            FieldName::new("state"),
            ValidationCode::UnsupportedState,
            UNSUPPORTED_STATE_MESSAGE,
            raw,
        )
    })
}

/// Parse the `approved` query parameter.
pub(crate) fn parse_approval(value: &str) -> Result<ApprovalDecision, Error> {
    value.parse::<ApprovalDecision>().map_err(|err| {
        field_error(
            FieldName::new("approved"),
            ValidationCode::InvalidApproval,
            err.to_string(),
            value,
        )
    })
}

/// `from`/`size` query parameters shared by every list endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Offset of the first element; rounded down to a page boundary.
    #[param(minimum = 0, default = 0)]
    pub from: Option<i64>,
    /// Page size.
    #[param(minimum = 1, default = 10)]
    pub size: Option<i64>,
}

impl PageQuery {
    /// Validate into a [`PageRequest`].
    pub(crate) fn page(self) -> Result<PageRequest, Error> {
        PageRequest::new(
            self.from.unwrap_or(DEFAULT_FROM),
            self.size.unwrap_or(DEFAULT_SIZE),
        )
        .map_err(map_page_error)
    }
}

fn map_page_error(error: PageRequestError) -> Error {
    let (field, value) = match error {
        PageRequestError::NegativeFrom { from } => ("from", from),
        PageRequestError::NonPositiveSize { size } => ("size", size),
    };
    field_error(
        FieldName::new(field),
        ValidationCode::InvalidPage,
        error.to_string(),
        &value.to_string(),
    )
}
