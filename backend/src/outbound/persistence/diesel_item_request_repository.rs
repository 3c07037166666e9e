//! PostgreSQL-backed `ItemRequestRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ItemRequestRepository, ItemRequestRepositoryError};
use crate::domain::{ItemRequest, ItemRequestId, NewItemRequest, UserId};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure};
use super::models::{NewRequestRow, RequestRow};
use super::paging::{limit, offset};
use super::pool::{DbPool, PoolError};
use super::schema::requests;

/// Diesel-backed implementation of [`ItemRequestRepository`].
#[derive(Clone)]
pub struct DieselItemRequestRepository {
    pool: DbPool,
}

impl DieselItemRequestRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRequestRepositoryError {
    map_pool_failure(error, ItemRequestRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ItemRequestRepositoryError {
    map_diesel_failure(
        error,
        ItemRequestRepositoryError::query,
        ItemRequestRepositoryError::connection,
    )
}

fn into_requests(rows: Vec<RequestRow>) -> Vec<ItemRequest> {
    rows.into_iter().map(RequestRow::into_domain).collect()
}

#[async_trait]
impl ItemRequestRepository for DieselItemRequestRepository {
    async fn insert(
        &self,
        request: &NewItemRequest,
    ) -> Result<ItemRequest, ItemRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(requests::table)
            .values(NewRequestRow {
                description: request.description(),
                requestor_id: request.requestor().as_i64(),
                created: request.created(),
            })
            .returning(RequestRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(RequestRow::into_domain)
            .map_err(map_diesel_error)
    }

    async fn find_by_id(
        &self,
        id: ItemRequestId,
    ) -> Result<Option<ItemRequest>, ItemRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        requests::table
            .find(id.as_i64())
            .select(RequestRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(RequestRow::into_domain))
            .map_err(map_diesel_error)
    }

    async fn list_by_requestor(
        &self,
        requestor: UserId,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        requests::table
            .filter(requests::requestor_id.eq(requestor.as_i64()))
            .order((requests::created.desc(), requests::id.desc()))
            .select(RequestRow::as_select())
            .load(&mut conn)
            .await
            .map(into_requests)
            .map_err(map_diesel_error)
    }

    async fn list_excluding_requestor(
        &self,
        user: UserId,
        page: PageRequest,
    ) -> Result<Vec<ItemRequest>, ItemRequestRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        requests::table
            .filter(requests::requestor_id.ne(user.as_i64()))
            .order((requests::created.desc(), requests::id.desc()))
            .offset(offset(page))
            .limit(limit(page))
            .select(RequestRow::as_select())
            .load(&mut conn)
            .await
            .map(into_requests)
            .map_err(map_diesel_error)
    }
}
