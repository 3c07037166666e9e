//! PostgreSQL-backed `CommentRepository` adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, ItemId, NewComment};

use super::diesel_error_mapping::{map_diesel_failure, map_pool_failure};
use super::models::{CommentRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of [`CommentRepository`].
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_pool_failure(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: DieselError) -> CommentRepositoryError {
    map_diesel_failure(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(NewCommentRow {
                text: comment.text.as_str(),
                item_id: comment.item.as_i64(),
                author_id: comment.author.as_i64(),
                created: comment.created,
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let author_name: String = users::table
            .find(row.author_id)
            .select(users::name)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(row.into_domain(author_name))
    }

    async fn list_by_item(&self, item: ItemId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(CommentRow, String)> = comments::table
            .inner_join(users::table)
            .filter(comments::item_id.eq(item.as_i64()))
            .order((comments::created.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), users::name))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(row, author_name)| row.into_domain(author_name))
            .collect())
    }
}
