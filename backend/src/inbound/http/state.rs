//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and only depend on
//! the driving ports, so they can be tested against mocks without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    BookingCommand, BookingQuery, BookingRepository, CommentRepository, ItemCommand, ItemQuery,
    ItemRepository, ItemRequestCommand, ItemRequestQuery, ItemRequestRepository, UserCommand,
    UserRepository, UsersQuery,
};
use crate::domain::{BookingService, ItemRequestService, ItemService, ItemStores, UserService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub items: Arc<dyn ItemCommand>,
    pub items_query: Arc<dyn ItemQuery>,
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub requests: Arc<dyn ItemRequestCommand>,
    pub requests_query: Arc<dyn ItemRequestQuery>,
}

/// Repositories backing every service.
pub struct Repositories<U, I, B, C, R> {
    pub users: Arc<U>,
    pub items: Arc<I>,
    pub bookings: Arc<B>,
    pub comments: Arc<C>,
    pub requests: Arc<R>,
}

impl HttpState {
    /// Wire the domain services over `repos` and `clock`.
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use shareit::inbound::http::state::{HttpState, Repositories};
    /// use shareit::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     Repositories {
    ///         users: Arc::clone(&store),
    ///         items: Arc::clone(&store),
    ///         bookings: Arc::clone(&store),
    ///         comments: Arc::clone(&store),
    ///         requests: store,
    ///     },
    ///     Arc::new(DefaultClock),
    /// );
    /// let _bookings = state.bookings.clone();
    /// ```
    pub fn from_repositories<U, I, B, C, R>(
        repos: Repositories<U, I, B, C, R>,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        U: UserRepository + 'static,
        I: ItemRepository + 'static,
        B: BookingRepository + 'static,
        C: CommentRepository + 'static,
        R: ItemRequestRepository + 'static,
    {
        let Repositories {
            users,
            items,
            bookings,
            comments,
            requests,
        } = repos;

        let user_service = Arc::new(UserService::new(Arc::clone(&users)));
        let booking_service = Arc::new(BookingService::new(
            Arc::clone(&bookings),
            Arc::clone(&items),
            Arc::clone(&users),
            Arc::clone(&clock),
        ));
        let request_service = Arc::new(ItemRequestService::new(
            Arc::clone(&requests),
            Arc::clone(&items),
            Arc::clone(&users),
            Arc::clone(&clock),
        ));
        let item_service = Arc::new(ItemService::new(
            ItemStores {
                items,
                bookings,
                comments,
                users,
                requests,
            },
            clock,
        ));

        Self {
            users: user_service.clone(),
            users_query: user_service,
            items: item_service.clone(),
            items_query: item_service,
            bookings: booking_service.clone(),
            bookings_query: booking_service,
            requests: request_service.clone(),
            requests_query: request_service,
        }
    }
}
