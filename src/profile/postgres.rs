use super::{ProfileStore, StoreError, UserProfile};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Profile lookups straight against the Postgres database behind the store.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    lookup_sql: String,
}

impl PostgresStore {
    /// Connect to the database at `database_url`, reading profiles from `table`.
    pub async fn connect(database_url: &str, table: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self::with_pool(pool, table))
    }

    pub fn with_pool(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            lookup_sql: lookup_sql(table),
        }
    }
}

fn lookup_sql(table: &str) -> String {
    format!(
        r#"
            SELECT full_name, parent_name, current_prompt FROM "{}"
            WHERE parent_phone = $1
            LIMIT 1
        "#,
        table.replace('"', "\"\"")
    )
}

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn lookup_by_phone(&self, phone: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(sqlx::query_as::<_, UserProfile>(&self.lookup_sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await?)
    }
}
