//! PostgreSQL-backed `ItemRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ItemRepository, ItemRepositoryError};
use crate::domain::{Item, ItemId, ItemRequestId, NewItem, UserId};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure};
use super::models::{ItemRow, ItemUpdate, NewItemRow};
use super::paging::{limit, offset};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel-backed implementation of [`ItemRepository`].
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ItemRepositoryError {
    map_pool_failure(error, ItemRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> ItemRepositoryError {
    map_diesel_failure(
        error,
        ItemRepositoryError::query,
        ItemRepositoryError::connection,
    )
}

fn into_items(rows: Vec<ItemRow>) -> Vec<Item> {
    rows.into_iter().map(ItemRow::into_domain).collect()
}

/// Escape `LIKE` metacharacters so user text matches literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &NewItem) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(items::table)
            .values(NewItemRow {
                name: item.name(),
                description: item.description(),
                is_available: item.available(),
                owner_id: item.owner().as_i64(),
                request_id: item.request_id().map(ItemRequestId::as_i64),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(ItemRow::into_domain)
            .map_err(map_diesel_error)
    }

    async fn update(&self, item: &Item) -> Result<Item, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(items::table.find(item.id().as_i64()))
            .set(ItemUpdate {
                name: item.name(),
                description: item.description(),
                is_available: item.available(),
            })
            .returning(ItemRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(ItemRow::into_domain)
            .ok_or_else(|| ItemRepositoryError::not_found(item.id()))
    }

    async fn find_by_id(&self, id: ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        items::table
            .find(id.as_i64())
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map(|row| row.map(ItemRow::into_domain))
            .map_err(map_diesel_error)
    }

    async fn list_by_owner(
        &self,
        owner: UserId,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        items::table
            .filter(items::owner_id.eq(owner.as_i64()))
            .order(items::id.asc())
            .offset(offset(page))
            .limit(limit(page))
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map(into_items)
            .map_err(map_diesel_error)
    }

    async fn search(
        &self,
        text: &str,
        page: PageRequest,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let pattern = like_pattern(text);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        items::table
            .filter(items::is_available.eq(true))
            .filter(
                items::name
                    .ilike(pattern.as_str())
                    .or(items::description.ilike(pattern.as_str())),
            )
            .order(items::id.asc())
            .offset(offset(page))
            .limit(limit(page))
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map(into_items)
            .map_err(map_diesel_error)
    }

    async fn list_by_request(
        &self,
        request: ItemRequestId,
    ) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        items::table
            .filter(items::request_id.eq(request.as_i64()))
            .order(items::id.asc())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map(into_items)
            .map_err(map_diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::like_pattern;

    #[rstest]
    #[case("drill", "%drill%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("c:\\tmp", "%c:\\\\tmp%")]
    fn like_pattern_escapes_metacharacters(#[case] text: &str, #[case] expected: &str) {
        assert_eq!(like_pattern(text), expected);
    }
}
