//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint of the inbound layer, the error
//! schema wrappers, and the `X-Sharer-User-Id` header as an API-key security
//! scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::sharer::SHARER_HEADER;

/// Registers the sharer header scheme referenced by the handlers.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SharerUserId",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                SHARER_HEADER,
                "Numeric id of the user performing the request.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ShareIt backend API",
        description = "Peer-to-peer item sharing: users, items, bookings, comments and requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::list_owned_items,
        crate::inbound::http::items::search_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::add_comment,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::confirm_booking,
        crate::inbound::http::bookings::list_booker_bookings,
        crate::inbound::http::bookings::list_owner_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::requests::create_request,
        crate::inbound::http::requests::list_own_requests,
        crate::inbound::http::requests::list_other_requests,
        crate::inbound::http::requests::get_request,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "User registration and profile"),
        (name = "items", description = "Item catalog, search and comments"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "requests", description = "Requests for items nobody lists yet"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        matches!(schema, RefOr::T(Schema::Object(obj)) if obj.properties.contains_key(field))
    }

    #[rstest]
    #[case("code")]
    #[case("message")]
    #[case("traceId")]
    fn error_schema_has_field(#[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");
        assert!(object_has_field(error_schema, field), "missing {field}");
    }

    #[rstest]
    #[case("/bookings")]
    #[case("/bookings/owner")]
    #[case("/bookings/{id}")]
    #[case("/items/search")]
    #[case("/items/{id}/comment")]
    #[case("/requests/all")]
    #[case("/users/{id}")]
    #[case("/health/ready")]
    fn document_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    #[case("200")]
    #[case("401")]
    #[case("403")]
    #[case("404")]
    fn booking_read_documents_status(#[case] status: &str) {
        let doc = ApiDoc::openapi();
        let operation = doc
            .paths
            .paths
            .get("/bookings/{id}")
            .and_then(|item| item.get.as_ref())
            .expect("GET /bookings/{id}");
        assert!(
            operation.responses.responses.contains_key(status),
            "missing {status}"
        );
    }

    #[rstest]
    fn sharer_header_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SharerUserId"));
    }
}
