//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`) are implemented by domain services and
//! consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod booking_query;
mod booking_repository;
mod comment_repository;
mod item_command;
mod item_query;
mod item_repository;
mod item_request_command;
mod item_request_query;
mod item_request_repository;
mod user_command;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{BookingCommand, CreateBookingRequest};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use booking_repository::MockBookingRepository;
pub use booking_repository::{BookingRepository, BookingRepositoryError};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use item_command::ItemCommand;
#[cfg(test)]
pub use item_command::MockItemCommand;
pub use item_query::ItemQuery;
#[cfg(test)]
pub use item_query::MockItemQuery;
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
pub use item_request_command::ItemRequestCommand;
#[cfg(test)]
pub use item_request_command::MockItemRequestCommand;
pub use item_request_query::ItemRequestQuery;
#[cfg(test)]
pub use item_request_query::MockItemRequestQuery;
#[cfg(test)]
pub use item_request_repository::MockItemRequestRepository;
pub use item_request_repository::{ItemRequestRepository, ItemRequestRepositoryError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
