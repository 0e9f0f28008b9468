use async_trait::async_trait;

use crate::application::repos::{ItemsRepo, NewItemParams, RepoError, UpdateItemParams};
use crate::domain::entities::ItemRecord;

use super::{SqliteRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: String,
}

impl From<ItemRow> for ItemRecord {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

#[async_trait]
impl ItemsRepo for SqliteRepositories {
    async fn create_item(&self, params: NewItemParams) -> Result<ItemRecord, RepoError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            INSERT INTO items (name, description)
            VALUES (?1, ?2)
            RETURNING id, name, description
            "#,
        )
        .bind(&params.name)
        .bind(&params.description)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn find_item(&self, id: i64) -> Result<Option<ItemRecord>, RepoError> {
        let row = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description FROM items WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(ItemRecord::from))
    }

    async fn update_item(&self, params: UpdateItemParams) -> Result<ItemRecord, RepoError> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            UPDATE items
            SET name = ?1, description = ?2
            WHERE id = ?3
            RETURNING id, name, description
            "#,
        )
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(ItemRecord::from).ok_or(RepoError::NotFound)
    }

    async fn delete_item(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_items(&self) -> Result<Vec<ItemRecord>, RepoError> {
        let rows = sqlx::query_as::<_, ItemRow>(
            "SELECT id, name, description FROM items ORDER BY id",
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ItemRecord::from).collect())
    }
}
