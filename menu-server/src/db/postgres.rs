use async_trait::async_trait;
use shared::models::{MenuItem, MenuItemCreate, Section, SectionCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::PgPool;

use super::ContentStore;
use crate::error::BoxError;

const ITEM_COLUMNS: &str = "id, name, description, price, section_id, image_url, created_at";

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and bring the schema up to date
    pub async fn connect(database_url: &str) -> Result<Self, BoxError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn list_sections(&self) -> Result<Vec<Section>, BoxError> {
        let rows = sqlx::query_as("SELECT id, name, created_at FROM sections ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_menu_items(&self) -> Result<Vec<MenuItem>, BoxError> {
        let rows = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_section(&self, id: i64) -> Result<Option<Section>, BoxError> {
        let row = sqlx::query_as("SELECT id, name, created_at FROM sections WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_menu_item(&self, id: i64) -> Result<Option<MenuItem>, BoxError> {
        let row = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_section(&self, data: &SectionCreate) -> Result<Section, BoxError> {
        let section = sqlx::query_as(
            r#"
            INSERT INTO sections (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(snowflake_id())
        .bind(&data.name)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        Ok(section)
    }

    async fn insert_menu_item(&self, data: &MenuItemCreate) -> Result<MenuItem, BoxError> {
        let item = sqlx::query_as(&format!(
            r#"
            INSERT INTO menu_items (id, name, description, price, section_id, image_url, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(snowflake_id())
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.section_id)
        .bind(&data.image_url)
        .bind(now_millis())
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    async fn delete_section(&self, id: i64) -> Result<bool, BoxError> {
        let mut tx = self.pool.begin().await?;

        // Section first: when it is already gone, nothing else may change
        let sections = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if sections == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let items = sqlx::query("DELETE FROM menu_items WHERE section_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        tracing::debug!(section_id = id, items, "Section deleted with its items");
        Ok(true)
    }

    async fn delete_menu_item(&self, id: i64) -> Result<bool, BoxError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    /// Runs only when `TEST_DATABASE_URL` points at a scratch database
    async fn store() -> Option<PgContentStore> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;
        Some(PgContentStore::connect(&url).await.unwrap())
    }

    #[tokio::test]
    async fn deleting_a_missing_section_leaves_its_orphans() {
        let Some(store) = store().await else {
            return;
        };
        let missing_section = snowflake_id();
        let orphan = store
            .insert_menu_item(&MenuItemCreate {
                name: "Stray muffin".into(),
                description: String::new(),
                price: Decimal::new(300, 2),
                section_id: missing_section,
                image_url: String::new(),
            })
            .await
            .unwrap();

        assert!(!store.delete_section(missing_section).await.unwrap());
        assert!(store.find_menu_item(orphan.id).await.unwrap().is_some());

        assert!(store.delete_menu_item(orphan.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_section_takes_its_items() {
        let Some(store) = store().await else {
            return;
        };
        let section = store
            .insert_section(&SectionCreate {
                name: "Pastries".into(),
            })
            .await
            .unwrap();
        let item = store
            .insert_menu_item(&MenuItemCreate {
                name: "Croissant".into(),
                description: String::new(),
                price: Decimal::new(275, 2),
                section_id: section.id,
                image_url: String::new(),
            })
            .await
            .unwrap();

        assert!(store.delete_section(section.id).await.unwrap());
        assert!(store.find_section(section.id).await.unwrap().is_none());
        assert!(store.find_menu_item(item.id).await.unwrap().is_none());
    }
}
