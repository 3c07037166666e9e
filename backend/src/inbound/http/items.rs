//! Item catalog and comment handlers.
//!
//! ```text
//! POST  /items               {"name":"Drill","description":"…","available":true}
//! PATCH /items/{id}          {"available":false}
//! GET   /items/{id}
//! GET   /items?from=0&size=10
//! GET   /items/search?text=drill&from=0&size=10
//! POST  /items/{id}/comment  {"text":"Works great"}
//! ```

use actix_web::{get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BookingSummary, Comment, CommentText, CommentValidationError, Error, Item, ItemDetails,
    ItemDraft, ItemId, ItemPatch, ItemRequestId, NewItem, map_item_validation_error,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::sharer::Sharer;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{PageQuery, format_local_datetime};

/// Payload for listing a new item.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemBody {
    #[serde(default)]
    #[schema(example = "Drill")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "Cordless, two batteries")]
    pub description: String,
    pub available: Option<bool>,
    /// Request this item answers, if any.
    pub request_id: Option<i64>,
}

/// Partial item update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateItemBody {
    pub name: Option<String>,
    pub description: Option<String>,
    pub available: Option<bool>,
}

/// Comment payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCommentBody {
    #[serde(default)]
    #[schema(example = "Works great")]
    pub text: String,
}

/// Reference to the last or next booking of an item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingSummaryBody {
    pub id: i64,
    pub booker_id: i64,
}

impl From<BookingSummary> for BookingSummaryBody {
    fn from(value: BookingSummary) -> Self {
        Self {
            id: value.id.as_i64(),
            booker_id: value.booker_id.as_i64(),
        }
    }
}

/// Comment as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: i64,
    pub text: String,
    pub author_name: String,
    #[schema(example = "2026-05-03T09:15:00")]
    pub created: String,
}

impl From<Comment> for CommentBody {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.as_i64(),
            text: value.text,
            author_name: value.author_name,
            created: format_local_datetime(value.created),
        }
    }
}

/// Item as returned by the API.
///
/// Booking references are only filled for the item's owner; search results
/// carry neither bookings nor comments.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub request_id: Option<i64>,
    pub last_booking: Option<BookingSummaryBody>,
    pub next_booking: Option<BookingSummaryBody>,
    pub comments: Vec<CommentBody>,
}

impl From<Item> for ItemBody {
    fn from(value: Item) -> Self {
        Self {
            id: value.id().as_i64(),
            owner_id: value.owner().as_i64(),
            name: value.name().to_owned(),
            description: value.description().to_owned(),
            available: value.available(),
            request_id: value.request_id().map(ItemRequestId::as_i64),
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}

impl From<ItemDetails> for ItemBody {
    fn from(value: ItemDetails) -> Self {
        let ItemDetails {
            item,
            availability,
            comments,
        } = value;
        Self {
            last_booking: availability.last_booking.map(BookingSummaryBody::from),
            next_booking: availability.next_booking.map(BookingSummaryBody::from),
            comments: comments.into_iter().map(CommentBody::from).collect(),
            ..Self::from(item)
        }
    }
}

/// Query parameters of the search endpoint.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive fragment of the name or description.
    pub text: Option<String>,
    #[param(minimum = 0, default = 0)]
    pub from: Option<i64>,
    #[param(minimum = 1, default = 10)]
    pub size: Option<i64>,
}

fn map_comment_validation_error(error: CommentValidationError) -> Error {
    let code = match error {
        CommentValidationError::Empty => "empty_text",
        CommentValidationError::TooLong { .. } => "text_too_long",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": "text", "code": code }))
}

fn parse_new_item(sharer: Sharer, body: CreateItemBody) -> Result<NewItem, Error> {
    let available = body.available.ok_or_else(|| {
        Error::invalid_request("available must be provided")
            .with_details(json!({ "field": "available", "code": "missing_available" }))
    })?;
    NewItem::new(ItemDraft {
        owner: sharer.id(),
        name: body.name,
        description: body.description,
        available,
        request_id: body.request_id.map(ItemRequestId::new),
    })
    .map_err(map_item_validation_error)
}

/// List an item owned by the acting user.
#[utoipa::path(
    post,
    path = "/items",
    request_body = CreateItemBody,
    responses(
        (status = 200, description = "Item created", body = ItemBody),
        (status = 400, description = "Invalid item", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user or request", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "createItem",
    security(("SharerUserId" = []))
)]
#[post("/items")]
pub async fn create_item(
    state: web::Data<HttpState>,
    sharer: Sharer,
    payload: web::Json<CreateItemBody>,
) -> ApiResult<web::Json<ItemBody>> {
    let item = parse_new_item(sharer, payload.into_inner())?;
    let created = state.items.create(item).await?;
    Ok(web::Json(created.into()))
}

/// Change an item owned by the acting user.
#[utoipa::path(
    patch,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = UpdateItemBody,
    responses(
        (status = 200, description = "Item updated", body = ItemBody),
        (status = 400, description = "Invalid field", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 403, description = "Caller does not own the item", body = ErrorSchema),
        (status = 404, description = "Unknown item", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "updateItem",
    security(("SharerUserId" = []))
)]
#[patch("/items/{id}")]
pub async fn update_item(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
    payload: web::Json<UpdateItemBody>,
) -> ApiResult<web::Json<ItemBody>> {
    let body = payload.into_inner();
    let patch = ItemPatch {
        name: body.name,
        description: body.description,
        available: body.available,
    };
    let updated = state
        .items
        .update(sharer.id(), ItemId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Items owned by the acting user, annotated with their bookings.
#[utoipa::path(
    get,
    path = "/items",
    params(PageQuery),
    responses(
        (status = 200, description = "Owned items", body = [ItemBody]),
        (status = 400, description = "Invalid page", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "listOwnedItems",
    security(("SharerUserId" = []))
)]
#[get("/items")]
pub async fn list_owned_items(
    state: web::Data<HttpState>,
    sharer: Sharer,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<ItemBody>>> {
    let page = query.into_inner().page()?;
    let items = state.items_query.list_owned(sharer.id(), page).await?;
    Ok(web::Json(items.into_iter().map(ItemBody::from).collect()))
}

/// Available items whose name or description contains `text`.
#[utoipa::path(
    get,
    path = "/items/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching items", body = [ItemBody]),
        (status = 400, description = "Invalid page", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "searchItems",
    security(("SharerUserId" = []))
)]
#[get("/items/search")]
pub async fn search_items(
    state: web::Data<HttpState>,
    sharer: Sharer,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<ItemBody>>> {
    let SearchQuery { text, from, size } = query.into_inner();
    let page = PageQuery { from, size }.page()?;
    let items = state
        .items_query
        .search(sharer.id(), text.unwrap_or_default(), page)
        .await?;
    Ok(web::Json(items.into_iter().map(ItemBody::from).collect()))
}

/// One item with its comments; the owner also sees last and next bookings.
#[utoipa::path(
    get,
    path = "/items/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item", body = ItemBody),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown item or user", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "getItem",
    security(("SharerUserId" = []))
)]
#[get("/items/{id}")]
pub async fn get_item(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ItemBody>> {
    let details = state
        .items_query
        .get(sharer.id(), ItemId::new(path.into_inner()))
        .await?;
    Ok(web::Json(details.into()))
}

/// Comment on an item the acting user has finished borrowing.
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    params(("id" = i64, Path, description = "Item id")),
    request_body = CreateCommentBody,
    responses(
        (status = 200, description = "Comment added", body = CommentBody),
        (status = 400, description = "Blank text or no completed booking", body = ErrorSchema),
        (status = 401, description = "Missing sharer header", body = ErrorSchema),
        (status = 404, description = "Unknown item or user", body = ErrorSchema)
    ),
    tags = ["items"],
    operation_id = "addComment",
    security(("SharerUserId" = []))
)]
#[post("/items/{id}/comment")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    sharer: Sharer,
    path: web::Path<i64>,
    payload: web::Json<CreateCommentBody>,
) -> ApiResult<web::Json<CommentBody>> {
    let text = CommentText::new(payload.into_inner().text).map_err(map_comment_validation_error)?;
    let comment = state
        .items
        .add_comment(sharer.id(), ItemId::new(path.into_inner()), text)
        .await?;
    Ok(web::Json(comment.into()))
}

/// Register item routes; `/items/search` precedes `/items/{id}`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_item)
        .service(update_item)
        .service(list_owned_items)
        .service(search_items)
        .service(get_item)
        .service(add_comment);
}

#[cfg(test)]
#[path = "items_tests.rs"]
mod tests;
