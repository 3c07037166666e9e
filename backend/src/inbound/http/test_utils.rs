//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use serde_json::Value;

use crate::domain::ports::{
    MockBookingCommand, MockBookingQuery, MockItemCommand, MockItemQuery, MockItemRequestCommand,
    MockItemRequestQuery, MockUserCommand, MockUsersQuery,
};
use crate::inbound::http::state::HttpState;

/// Mocks for every driving port; unset expectations fail the test on use.
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUserCommand,
    pub users_query: MockUsersQuery,
    pub items: MockItemCommand,
    pub items_query: MockItemQuery,
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
    pub requests: MockItemRequestCommand,
    pub requests_query: MockItemRequestQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            users: Arc::new(self.users),
            users_query: Arc::new(self.users_query),
            items: Arc::new(self.items),
            items_query: Arc::new(self.items_query),
            bookings: Arc::new(self.bookings),
            bookings_query: Arc::new(self.bookings_query),
            requests: Arc::new(self.requests),
            requests_query: Arc::new(self.requests_query),
        }
    }
}

/// Read a response body as JSON.
pub async fn read_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}
