//! User management handlers.
//!
//! ```text
//! POST   /users       {"name":"Ada","email":"ada@example.com"}
//! GET    /users
//! GET    /users/{id}
//! PATCH  /users/{id}  {"email":"ada@lovelace.dev"}
//! DELETE /users/{id}
//! ```
//!
//! These endpoints do not read the sharer header.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewUser, User, UserId, UserPatch, map_user_validation_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateUserBody {
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
}

/// Partial update; omitted fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserBody {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserBody {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().as_i64(),
            name: value.name().to_owned(),
            email: value.email().to_owned(),
        }
    }
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users",
    request_body = CreateUserBody,
    responses(
        (status = 200, description = "User registered", body = UserBody),
        (status = 400, description = "Invalid name or email", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<web::Json<UserBody>> {
    let body = payload.into_inner();
    let user = NewUser::new(body.name, body.email).map_err(map_user_validation_error)?;
    let created = state.users.create(user).await?;
    Ok(web::Json(created.into()))
}

/// List every user ordered by id.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = [UserBody]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserBody>>> {
    let users = state.users_query.list_users().await?;
    Ok(web::Json(users.into_iter().map(UserBody::from).collect()))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security([])
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserBody>> {
    let user = state
        .users_query
        .get(UserId::new(path.into_inner()))
        .await?;
    Ok(web::Json(user.into()))
}

/// Change a user's name or email.
#[utoipa::path(
    patch,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserBody,
    responses(
        (status = 200, description = "User updated", body = UserBody),
        (status = 400, description = "Invalid name or email", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser",
    security([])
)]
#[patch("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateUserBody>,
) -> ApiResult<web::Json<UserBody>> {
    let body = payload.into_inner();
    let patch = UserPatch {
        name: body.name,
        email: body.email,
    };
    let updated = state
        .users
        .update(UserId::new(path.into_inner()), patch)
        .await?;
    Ok(web::Json(updated.into()))
}

/// Remove a user together with their items and requests.
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser",
    security([])
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state.users.delete(UserId::new(path.into_inner())).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Register user routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(list_users)
        .service(get_user)
        .service(update_user)
        .service(delete_user);
}
