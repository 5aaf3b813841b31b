use crate::core::AppError;
use crate::db::store::DocumentStore;
use crate::models::profiles::Profile;

const COLLECTION: &str = "profiles";

/// Latest submission wins: the profile document is keyed by the owner's email
/// and overwritten wholesale.
pub async fn upsert_profile<S: DocumentStore>(store: &S, profile: &Profile) -> Result<(), AppError> {
    store
        .set(COLLECTION, &profile.email, serde_json::to_value(profile)?)
        .await
}

pub async fn find_profile<S: DocumentStore>(
    store: &S,
    email: &str,
) -> Result<Option<Profile>, AppError> {
    store
        .get(COLLECTION, email)
        .await?
        .map(|doc| serde_json::from_value(doc).map_err(AppError::from))
        .transpose()
}

pub async fn list_profiles<S: DocumentStore>(store: &S) -> Result<Vec<Profile>, AppError> {
    let docs = store.stream_all(COLLECTION).await?;
    Ok(super::decode_documents(docs, COLLECTION))
}
