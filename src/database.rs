//! PostgreSQL-backed knowledge search
//!
//! The datastore variant of retrieval: rows are filtered with
//! `ILIKE`/array-overlap per query token and capped, with no relevance
//! scoring. Result order is storage order, so this backend has weaker
//! ordering guarantees than the in-memory scorer and the two backends may
//! return differently ordered results for the same query.

use sqlx::PgPool;

use crate::errors::HajjRagError;
use crate::models::KnowledgeItem;
use crate::Result;

const SCHEMA_DDL: &str = r"
CREATE TABLE IF NOT EXISTS hajj_knowledge (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    category TEXT NOT NULL,
    keywords TEXT[] NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
";

/// Database connection pool wrapper
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new database instance from configuration
    pub async fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        let db = config.database.as_ref().ok_or_else(|| {
            HajjRagError::Config(
                "datastore backend selected but [database] is not configured".to_string(),
            )
        })?;

        let pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .acquire_timeout(std::time::Duration::from_secs(db.connection_timeout));

        let pool = pool_options.connect(&db.url).await?;

        tracing::info!(
            "Database pool configured: max_connections={}, min_connections={}",
            db.max_connections,
            db.min_connections
        );

        Ok(Self::new(pool))
    }

    /// Create the knowledge table if it does not exist
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA_DDL).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert knowledge items, skipping ids that already exist.
    ///
    /// Returns the number of newly inserted rows.
    pub async fn seed_knowledge(&self, items: &[KnowledgeItem]) -> Result<u64> {
        let mut inserted = 0;
        for item in items {
            let result = sqlx::query(
                "INSERT INTO hajj_knowledge (id, title, content, category, keywords, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(&item.id)
            .bind(&item.title)
            .bind(&item.content)
            .bind(&item.category)
            .bind(&item.keywords)
            .bind(item.created_at)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Count stored knowledge items
    pub async fn count_knowledge(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hajj_knowledge")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Search knowledge rows matching any query token.
    ///
    /// A row matches when its title or content contains a token
    /// (case-insensitive) or its keyword array overlaps the token list.
    /// An empty token list returns no rows without touching the database.
    pub async fn search_knowledge(
        &self,
        tokens: &[String],
        limit: usize,
    ) -> Result<Vec<KnowledgeItem>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let patterns = like_patterns(tokens);

        let items = sqlx::query_as::<_, KnowledgeItem>(
            "SELECT id, title, content, category, keywords, created_at
             FROM hajj_knowledge
             WHERE title ILIKE ANY($1) OR content ILIKE ANY($1) OR keywords && $2
             LIMIT $3",
        )
        .bind(&patterns)
        .bind(tokens)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// List all stored knowledge items
    pub async fn list_knowledge(&self) -> Result<Vec<KnowledgeItem>> {
        let items = sqlx::query_as::<_, KnowledgeItem>(
            "SELECT id, title, content, category, keywords, created_at
             FROM hajj_knowledge
             ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get a reference to the database pool for raw queries
    #[must_use]
    pub const fn pool(&self) -> &sqlx::PgPool {
        &self.pool
    }
}

fn like_patterns(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|token| format!("%{token}%")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_patterns_wrap_tokens() {
        let tokens = vec!["tawaf".to_string(), "ihram".to_string()];
        assert_eq!(like_patterns(&tokens), vec!["%tawaf%", "%ihram%"]);
    }

    #[test]
    fn test_like_patterns_empty() {
        assert!(like_patterns(&[]).is_empty());
    }
}
