use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::core::AppError;
use crate::db::store::DocumentStore;
use crate::models::interactions::{InteractionKey, InteractionKind, InteractionRecord};

/// Records that a user saved or applied to a scholarship. Idempotent: when a
/// record already exists nothing is written and the original timestamp
/// stands. Returns whether a record was created.
pub async fn mark<S: DocumentStore>(
    store: &S,
    email: &str,
    scholarship_id: &str,
    kind: InteractionKind,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let key = InteractionKey {
        email,
        scholarship_id,
        kind,
    };
    let record = InteractionRecord {
        email: email.to_string(),
        scholarship_id: scholarship_id.to_string(),
        kind,
        created_at: now,
    };

    store
        .insert_new(key.collection(), &key.doc_id(), serde_json::to_value(&record)?)
        .await
}

pub async fn is_marked<S: DocumentStore>(
    store: &S,
    email: &str,
    scholarship_id: &str,
    kind: InteractionKind,
) -> Result<bool, AppError> {
    let key = InteractionKey {
        email,
        scholarship_id,
        kind,
    };

    Ok(store.get(key.collection(), &key.doc_id()).await?.is_some())
}

/// Scholarship ids the user has tracked under one kind.
pub async fn list_ids<S: DocumentStore>(
    store: &S,
    email: &str,
    kind: InteractionKind,
) -> Result<HashSet<String>, AppError> {
    let docs = store.query_eq(kind.collection(), "email", email).await?;

    Ok(
        super::decode_documents::<InteractionRecord>(docs, kind.collection())
            .into_iter()
            .map(|record| record.scholarship_id)
            .collect(),
    )
}

/// Saved and applied ids in one batched fetch, reused across a request or a
/// sweep iteration instead of re-querying per scholarship.
pub async fn tracked_ids<S: DocumentStore>(
    store: &S,
    email: &str,
) -> Result<HashSet<String>, AppError> {
    let (saved, applied) = tokio::join!(
        list_ids(store, email, InteractionKind::Saved),
        list_ids(store, email, InteractionKind::Applied),
    );

    let mut ids = saved?;
    ids.extend(applied?);
    Ok(ids)
}
