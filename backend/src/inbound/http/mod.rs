//! HTTP inbound adapter exposing the ShareIt REST endpoints.

use actix_web::web;

pub mod bookings;
pub mod error;
pub mod health;
pub mod items;
pub mod requests;
pub mod schemas;
pub mod sharer;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

/// Register every ShareIt route and the JSON and query error handlers.
///
/// Health checks are registered separately because they carry their own
/// state.
///
/// ```
/// use actix_web::App;
/// use shareit::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .configure(users::configure)
        .configure(items::configure)
        .configure(bookings::configure)
        .configure(requests::configure);
}
