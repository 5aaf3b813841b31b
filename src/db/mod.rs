use serde::de::DeserializeOwned;
use serde_json::Value;

pub mod interactions;
pub mod profiles;
pub mod scholarships;
pub mod store;
pub mod users;

/// Decodes a batch of raw documents, skipping any that no longer match the
/// expected shape so one broken document cannot take down a view or a sweep.
pub(crate) fn decode_documents<T: DeserializeOwned>(docs: Vec<Value>, collection: &str) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| match serde_json::from_value(doc) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                tracing::warn!("Skipping malformed document in `{}`: {}", collection, error);
                None
            }
        })
        .collect()
}
