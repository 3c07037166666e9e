//! Item request handlers.
//!
//! ```text
//! POST /requests                    {"description":"Need a ladder"}
//! GET  /requests
//! GET  /requests/all?from=0&size=10
//! GET  /requests/{id}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ItemRequestDetails, ItemRequestId, RequestAnswer};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::sharer::Sharer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, format_local_datetime};

/// Payload for asking the community for an item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateRequestBody {
    #[serde(default)]
    #[schema(example = "Need a ladder for the weekend")]
    pub description: String,
}

/// Item listed in answer to a request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestAnswerBody {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner_id: i64,
    pub request_id: i64,
}

impl From<RequestAnswer> for RequestAnswerBody {
    fn from(value: RequestAnswer) -> Self {
        Self {
            id: value.item_id.as_i64(),
            name: value.name,
            description: value.description,
            available: value.available,
            owner_id: value.owner_id.as_i64(),
            request_id: value.request_id.as_i64(),
        }
    }
}

/// Request with the items answering it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub id: i64,
    pub description: String,
    #[schema(example = "2026-05-01T08:00:00")]
    pub created: String,
    pub requestor_id: i64,
    pub items: Vec<RequestAnswerBody>,
}

impl From<ItemRequestDetails> for RequestBody {
    fn from(value: ItemRequestDetails) -> Self {
        let ItemRequestDetails { request, items } = value;
        Self {
            id: request.id.as_i64(),
            description: request.description,
            created: format_local_datetime(request.created),
            requestor_id: request.requestor.as_i64(),
            items: items.into_iter().map(RequestAnswerBody::from).collect(),
        }
    }
}

fn into_bodies(requests: Vec<ItemRequestDetails>) -> Vec<RequestBody> {
    requests.into_iter().map(RequestBody::from).collect()
}

/// Record a request on behalf of the acting user.
#[utoipa::path(
    post,
    path = "/requests",
    request_body = CreateRequestBody,
    responses(
        (status = 200, description = "Request recorded", body = RequestBody),
        (status = 400, description = "Blank or oversized description", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "createRequest",
    security(("SharerUserId" = []))
)]
#[post("/requests")]
pub async fn create_request(
    state: web::Data<HttpState>,
    sharer: Sharer,
    payload: web::Json<CreateRequestBody>,
) -> ApiResult<web::Json<RequestBody>> {
    let created = state
        .requests
        .create(sharer.id(), payload.into_inner().description)
        .await?;
    Ok(web::Json(created.into()))
}

/// The acting user's own requests, newest first.
#[utoipa::path(
    get,
    path = "/requests",
    responses(
        (status = 200, description = "Own requests", body = [RequestBody]),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listOwnRequests",
    security(("SharerUserId" = []))
)]
#[get("/requests")]
pub async fn list_own_requests(
    state: web::Data<HttpState>,
    sharer: Sharer,
) -> ApiResult<web::Json<Vec<RequestBody>>> {
    let requests = state.requests_query.list_own(sharer.id()).await?;
    Ok(web::Json(into_bodies(requests)))
}

/// Requests made by other users, newest first.
#[utoipa::path(
    get,
    path = "/requests/all",
    params(PageQuery),
    responses(
        (status = 200, description = "Other users' requests", body = [RequestBody]),
        (status = 400, description = "Invalid page", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "listOtherRequests",
    security(("SharerUserId" = []))
)]
#[get("/requests/all")]
pub async fn list_other_requests(
    state: web::Data<HttpState>,
    sharer: Sharer,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<RequestBody>>> {
    let page = query.into_inner().page()?;
    let requests = state
        .requests_query
        .list_others(sharer.id(), page)
        .await?;
    Ok(web::Json(into_bodies(requests)))
}

/// One request with its answers.
#[utoipa::path(
    get,
    path = "/requests/{id}",
    params(("id" = i64, Path, description = "Request id")),
    responses(
        (status = 200, description = "Request", body = RequestBody),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown request or user", body = ErrorSchema)
    ),
    tags = ["requests"],
    operation_id = "getRequest",
    security(("SharerUserId" = []))
)]
#[get("/requests/{id}")]
pub async fn get_request(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RequestBody>> {
    let request = state
        .requests_query
        .get(sharer.id(), ItemRequestId::new(path.into_inner()))
        .await?;
    Ok(web::Json(request.into()))
}

/// Register request routes; `/requests/all` precedes `/requests/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_request)
        .service(list_own_requests)
        .service(list_other_requests)
        .service(get_request);
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::{NaiveDate, NaiveDateTime};
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{Error, ItemId, ItemRequest, UserId};
    use crate::inbound::http::sharer::SHARER_HEADER;
    use crate::inbound::http::test_utils::{MockPorts, read_json};

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 1)
            .and_then(|date| date.and_hms_opt(8, 0, 0))
            .expect("valid timestamp")
    }

    fn ladder_request() -> ItemRequestDetails {
        ItemRequestDetails {
            request: ItemRequest {
                id: ItemRequestId::new(4),
                description: "Need a ladder".to_owned(),
                requestor: UserId::new(2),
                created: created(),
            },
            items: vec![RequestAnswer {
                item_id: ItemId::new(8),
                name: "Ladder".to_owned(),
                description: "Three metres".to_owned(),
                available: true,
                owner_id: UserId::new(1),
                request_id: ItemRequestId::new(4),
            }],
        }
    }

    fn test_app(
        ports: MockPorts,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(ports.into_state()))
            .configure(configure)
    }

    #[actix_web::test]
    async fn create_renders_request_with_answers() {
        let mut ports = MockPorts::default();
        ports
            .requests
            .expect_create()
            .withf(|requestor, description| {
                *requestor == UserId::new(2) && description == "Need a ladder"
            })
            .times(1)
            .returning(|_, _| Ok(ladder_request()));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::post()
            .uri("/requests")
            .insert_header((SHARER_HEADER, "2"))
            .set_json(json!({ "description": "Need a ladder" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({
                "id": 4,
                "description": "Need a ladder",
                "created": "2026-05-01T08:00:00",
                "requestorId": 2,
                "items": [{
                    "id": 8,
                    "name": "Ladder",
                    "description": "Three metres",
                    "available": true,
                    "ownerId": 1,
                    "requestId": 4,
                }],
            })
        );
    }

    #[actix_web::test]
    async fn blank_description_surfaces_service_error() {
        let mut ports = MockPorts::default();
        ports
            .requests
            .expect_create()
            .withf(|_, description| description.is_empty())
            .returning(|_, _| Err(Error::invalid_request("description must not be empty")));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::post()
            .uri("/requests")
            .insert_header((SHARER_HEADER, "2"))
            .set_json(json!({}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn all_is_not_mistaken_for_an_id() {
        let expected = PageRequest::new(0, 20).expect("valid page");
        let mut ports = MockPorts::default();
        ports
            .requests_query
            .expect_list_others()
            .withf(move |user, page| *user == UserId::new(1) && *page == expected)
            .times(1)
            .returning(|_, _| Ok(vec![ladder_request()]));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/requests/all?size=20")
            .insert_header((SHARER_HEADER, "1"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body[0]["requestorId"], Value::from(2));
    }

    #[rstest]
    #[case("/requests/all?from=-3")]
    #[case("/requests/all?size=0")]
    #[actix_web::test]
    async fn invalid_page_is_rejected(#[case] uri: &str) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;

        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header((SHARER_HEADER, "1"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn own_requests_are_listed() {
        let mut ports = MockPorts::default();
        ports
            .requests_query
            .expect_list_own()
            .withf(|user| *user == UserId::new(2))
            .returning(|_| Ok(vec![ladder_request()]));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/requests")
            .insert_header((SHARER_HEADER, "2"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        let body = read_json(response).await;
        assert_eq!(body.as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn unknown_request_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .requests_query
            .expect_get()
            .withf(|_, id| *id == ItemRequestId::new(99))
            .returning(|_, id| Err(Error::not_found(format!("Request {id} not found"))));
        let app = actix_test::init_service(test_app(ports)).await;

        let request = actix_test::TestRequest::get()
            .uri("/requests/99")
            .insert_header((SHARER_HEADER, "2"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
