use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures_util::TryStreamExt;
use serde_json::Value;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{MySqlPool, Row};

use crate::core::AppError;

/// Key-document storage as the matching core consumes it. `stream_all` makes
/// no ordering guarantee; callers that need determinism sort for themselves.
#[allow(async_fn_in_trait)]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, AppError>;

    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<(), AppError>;

    /// Writes the document only when the id is free and reports whether a
    /// write happened. Existence check and creation are one keyed insert, so
    /// repeated calls cannot race into duplicates.
    async fn insert_new(&self, collection: &str, id: &str, doc: Value) -> Result<bool, AppError>;

    /// Documents whose top-level `field` equals `value`.
    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppError>;

    async fn stream_all(&self, collection: &str) -> Result<Vec<Value>, AppError>;
}

/// Production store: one `documents` table with `(collection, doc_id)` as the
/// primary key and the document body as a JSON column.
#[derive(Clone)]
pub struct MySqlDocStore {
    pool: MySqlPool,
}

impl MySqlDocStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn decode_rows(rows: Vec<MySqlRow>) -> Result<Vec<Value>, AppError> {
        rows.into_iter()
            .map(|row| {
                row.try_get::<Json<Value>, _>("body")
                    .map(|json| json.0)
                    .map_err(AppError::db_error)
            })
            .collect()
    }
}

impl DocumentStore for MySqlDocStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, AppError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = ? AND doc_id = ?")
            .bind(collection)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::db_error)?;

        match row {
            Some(row) => {
                let body: Json<Value> = row.try_get("body").map_err(AppError::db_error)?;
                Ok(Some(body.0))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?, ?, ?) \
             ON DUPLICATE KEY UPDATE body = VALUES(body)",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(doc))
        .execute(&self.pool)
        .await
        .map_err(AppError::db_error)?;

        Ok(())
    }

    async fn insert_new(&self, collection: &str, id: &str, doc: Value) -> Result<bool, AppError> {
        let result =
            sqlx::query("INSERT IGNORE INTO documents (collection, doc_id, body) VALUES (?, ?, ?)")
                .bind(collection)
                .bind(id)
                .bind(Json(doc))
                .execute(&self.pool)
                .await
                .map_err(AppError::db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppError> {
        let rows: Vec<MySqlRow> = sqlx::query(
            "SELECT body FROM documents WHERE collection = ? \
             AND JSON_UNQUOTE(JSON_EXTRACT(body, ?)) = ?",
        )
        .bind(collection)
        .bind(format!("$.{}", field))
        .bind(value)
        .fetch(&self.pool)
        .try_collect()
        .await
        .map_err(AppError::db_error)?;

        Self::decode_rows(rows)
    }

    async fn stream_all(&self, collection: &str) -> Result<Vec<Value>, AppError> {
        let rows: Vec<MySqlRow> = sqlx::query("SELECT body FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch(&self.pool)
            .try_collect()
            .await
            .map_err(AppError::db_error)?;

        Self::decode_rows(rows)
    }
}

/// In-memory store with the same contract, used by tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, BTreeMap<String, Value>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, BTreeMap<String, Value>>> {
        self.collections.read().expect("memory store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, BTreeMap<String, Value>>> {
        self.collections
            .write()
            .expect("memory store lock poisoned")
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, AppError> {
        Ok(self
            .read()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, doc: Value) -> Result<(), AppError> {
        self.write()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn insert_new(&self, collection: &str, id: &str, doc: Value) -> Result<bool, AppError> {
        let mut collections = self.write();
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            Ok(false)
        } else {
            docs.insert(id.to_string(), doc);
            Ok(true)
        }
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, AppError> {
        Ok(self
            .read()
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field).and_then(Value::as_str) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn stream_all(&self, collection: &str) -> Result<Vec<Value>, AppError> {
        Ok(self
            .read()
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_none, assert_ok, assert_some};
    use serde_json::json;

    #[tokio::test]
    async fn insert_new_writes_once_and_keeps_the_original() {
        let store = MemoryStore::new();

        let first = assert_ok!(
            store
                .insert_new("users", "a@example.com", json!({"n": 1}))
                .await
        );
        let second = assert_ok!(
            store
                .insert_new("users", "a@example.com", json!({"n": 2}))
                .await
        );

        assert!(first);
        assert!(!second);

        let doc = assert_some!(assert_ok!(store.get("users", "a@example.com").await));
        assert_eq!(doc["n"], 1);
    }

    #[tokio::test]
    async fn set_overwrites_in_place() {
        let store = MemoryStore::new();

        assert_ok!(store.set("profiles", "a@example.com", json!({"v": 1})).await);
        assert_ok!(store.set("profiles", "a@example.com", json!({"v": 2})).await);

        let doc = assert_some!(assert_ok!(store.get("profiles", "a@example.com").await));
        assert_eq!(doc["v"], 2);
        assert_eq!(assert_ok!(store.stream_all("profiles").await).len(), 1);
    }

    #[tokio::test]
    async fn query_eq_matches_on_a_top_level_string_field() {
        let store = MemoryStore::new();

        assert_ok!(
            store
                .set("saved", "k1", json!({"email": "a@example.com", "id": "s-1"}))
                .await
        );
        assert_ok!(
            store
                .set("saved", "k2", json!({"email": "b@example.com", "id": "s-2"}))
                .await
        );

        let docs = assert_ok!(store.query_eq("saved", "email", "a@example.com").await);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["id"], "s-1");
    }

    #[tokio::test]
    async fn missing_collection_and_document_read_as_absent() {
        let store = MemoryStore::new();

        assert_none!(assert_ok!(store.get("users", "nobody@example.com").await));
        assert!(assert_ok!(store.stream_all("users").await).is_empty());
    }
}
