//! Caller identification via the `X-Sharer-User-Id` header.
//!
//! Every ShareIt endpoint except user management acts on behalf of the user
//! named in this header. Handlers take a [`Sharer`] argument and never read
//! headers themselves.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::{Error, UserId};

/// Header naming the acting user.
pub const SHARER_HEADER: &str = "X-Sharer-User-Id";

/// Identifier of the user performing the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sharer(pub UserId);

impl Sharer {
    /// The acting user.
    pub fn id(self) -> UserId {
        self.0
    }

    fn from_header(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(SHARER_HEADER)
            .ok_or_else(|| {
                Error::unauthorized(format!("missing {SHARER_HEADER} header"))
                    .with_details(json!({ "header": SHARER_HEADER, "code": "missing_header" }))
            })?;
        raw.to_str()
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .map(Self)
            .ok_or_else(|| {
                Error::unauthorized(format!("{SHARER_HEADER} must be an integer user id"))
                    .with_details(json!({ "header": SHARER_HEADER, "code": "invalid_header" }))
            })
    }
}

impl FromRequest for Sharer {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_header(req))
    }
}
