use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::core::{current_time_millis, EntityId, EntityKind};
use crate::error::{AppError, AppResult};
use crate::infrastructure::database::{Document, EntityStore, NewDocument, StoredDocument};
use crate::infrastructure::id_generator::EntityIdGenerator;

const SELECT_COLUMNS: &str = "id, kind, schema_version, data, time_created, time_updated";

/// SQLite implementation of the entity store
pub struct SqliteDatabase {
    pool: SqlitePool,
    id_generator: EntityIdGenerator,
}

impl SqliteDatabase {
    /// Connect to `url` (e.g. `sqlite:data/lobby_graph.db` or `sqlite::memory:`)
    /// and create the schema if it does not exist yet
    pub async fn connect(url: &str, max_connections: u32, node_id: u16) -> AppResult<Self> {
        if node_id > EntityIdGenerator::MAX_NODE_ID {
            return Err(AppError::ConfigurationError(format!(
                "NODE_ID must be at most {}, got {}",
                EntityIdGenerator::MAX_NODE_ID,
                node_id
            )));
        }

        let in_memory = url.contains(":memory:");
        if !in_memory {
            ensure_parent_dir(url)?;
        }

        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::ConfigurationError(format!("Invalid database url {}: {}", url, e)))?
            .create_if_missing(true);

        // every connection to :memory: is a separate database, so pin a single one
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to connect to {}: {}", url, e))
        })?;

        let db = Self {
            pool,
            id_generator: EntityIdGenerator::new(node_id),
        };
        db.initialize().await?;
        Ok(db)
    }

    pub async fn new_in_memory() -> AppResult<Self> {
        Self::connect("sqlite::memory:", 1, 0).await
    }

    /// Create the entities table and its indexes
    pub async fn initialize(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entities (
                id INTEGER PRIMARY KEY,
                kind TEXT NOT NULL,
                schema_version INTEGER NOT NULL DEFAULT 1,
                unique_key TEXT,
                data TEXT NOT NULL,
                time_created INTEGER NOT NULL,
                time_updated INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create entities table: {}", e)))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_entities_kind ON entities(kind, id)")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create kind index: {}", e)))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_entities_unique_key ON entities(kind, unique_key)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create unique key index: {}", e)))?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl EntityStore for SqliteDatabase {
    async fn insert(&self, document: NewDocument) -> AppResult<StoredDocument> {
        let id = self.id_generator.next_id();
        let now = current_time_millis();
        let data = serde_json::to_string(&document.data)?;

        debug!(kind = %document.kind, %id, "inserting document");

        let result = sqlx::query(
            "INSERT INTO entities (id, kind, schema_version, unique_key, data, time_created, time_updated) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.value())
        .bind(document.kind.as_str())
        .bind(document.schema_version as i64)
        .bind(document.unique_key.as_deref())
        .bind(data)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(StoredDocument {
                id,
                kind: document.kind,
                schema_version: document.schema_version,
                data: document.data,
                created_time: now,
                updated_time: now,
            }),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                AppError::DuplicateEmail(document.unique_key.unwrap_or_default()),
            ),
            Err(e) => Err(AppError::DatabaseError(format!(
                "Failed to create {} {}: {}",
                document.kind, id, e
            ))),
        }
    }

    async fn get(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<StoredDocument>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM entities WHERE kind = ? AND id = ?",
            SELECT_COLUMNS
        ))
        .bind(kind.as_str())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get {} {}: {}", kind, id, e)))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn find(&self, kind: EntityKind, criteria: &Document) -> AppResult<Vec<StoredDocument>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM entities WHERE kind = ",
            SELECT_COLUMNS
        ));
        qb.push_bind(kind.as_str());

        for (field, value) in criteria {
            let path = json_path(field)?;
            qb.push(" AND json_extract(data, ");
            qb.push_bind(path);
            match value {
                Value::Null => {
                    qb.push(") IS NULL");
                }
                Value::Bool(flag) => {
                    qb.push(") = ");
                    qb.push_bind(*flag as i64);
                }
                Value::Number(number) => {
                    qb.push(") = ");
                    if let Some(int) = number.as_i64() {
                        qb.push_bind(int);
                    } else {
                        qb.push_bind(number.as_f64().unwrap_or_default());
                    }
                }
                Value::String(text) => {
                    qb.push(") = ");
                    qb.push_bind(text.clone());
                }
                Value::Array(_) | Value::Object(_) => {
                    return Err(AppError::Validation(format!(
                        "Filter on {} must be a scalar value",
                        field
                    )));
                }
            }
        }

        qb.push(" ORDER BY id");

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to query {} documents: {}", kind, e)))?;

        rows.iter().map(row_to_document).collect()
    }

    async fn merge(
        &self,
        kind: EntityKind,
        id: EntityId,
        patch: Document,
    ) -> AppResult<Option<StoredDocument>> {
        let now = current_time_millis();
        let patch = serde_json::to_string(&patch)?;

        debug!(%kind, %id, "merging document");

        // json_patch keeps every key the patch does not mention
        let row = sqlx::query(&format!(
            "UPDATE entities SET data = json_patch(data, ?), time_updated = ? WHERE kind = ? AND id = ? RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(patch)
        .bind(now)
        .bind(kind.as_str())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update {} {}: {}", kind, id, e)))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn append(
        &self,
        kind: EntityKind,
        id: EntityId,
        field: &str,
        value: Value,
    ) -> AppResult<bool> {
        let path = json_path(field)?;
        let now = current_time_millis();

        let result = sqlx::query(
            "UPDATE entities SET data = json_set(data, ?, json_insert(COALESCE(json_extract(data, ?), json('[]')), '$[#]', json(?))), time_updated = ? WHERE kind = ? AND id = ?",
        )
        .bind(path.clone())
        .bind(path)
        .bind(value.to_string())
        .bind(now)
        .bind(kind.as_str())
        .bind(id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(format!("Failed to append to {}.{} on {}: {}", kind, field, id, e))
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, kind: EntityKind, id: EntityId) -> AppResult<Option<StoredDocument>> {
        debug!(%kind, %id, "deleting document");

        let row = sqlx::query(&format!(
            "DELETE FROM entities WHERE kind = ? AND id = ? RETURNING {}",
            SELECT_COLUMNS
        ))
        .bind(kind.as_str())
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to delete {} {}: {}", kind, id, e)))?;

        row.as_ref().map(row_to_document).transpose()
    }

    async fn exists(&self, kind: EntityKind, id: EntityId) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM entities WHERE kind = ? AND id = ?")
            .bind(kind.as_str())
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to check if {} {} exists: {}", kind, id, e))
            })?;
        Ok(row.is_some())
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Health check failed: {}", e)))?;
        Ok(())
    }
}

fn row_to_document(row: &SqliteRow) -> AppResult<StoredDocument> {
    let kind: String = row.try_get("kind")?;
    let data: String = row.try_get("data")?;

    Ok(StoredDocument {
        id: EntityId::new(row.try_get("id")?),
        kind: kind.parse().map_err(AppError::DatabaseError)?,
        schema_version: row.try_get::<i64, _>("schema_version")? as u32,
        data: serde_json::from_str(&data)
            .map_err(|e| AppError::DatabaseError(format!("Corrupt document body: {}", e)))?,
        created_time: row.try_get("time_created")?,
        updated_time: row.try_get("time_updated")?,
    })
}

/// `$.field` for a top-level field name
fn json_path(field: &str) -> AppResult<String> {
    let valid = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(AppError::Validation(format!("Invalid field name: {:?}", field)));
    }
    Ok(format!("$.{}", field))
}

fn ensure_parent_dir(url: &str) -> AppResult<()> {
    let path = url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or_default();

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::ConfigurationError(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
