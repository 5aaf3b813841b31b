use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::AppError;
use crate::db::store::DocumentStore;
use crate::models::scholarships::{CreateScholarshipRequest, Scholarship};

const COLLECTION: &str = "scholarships";

pub async fn create_scholarship<S: DocumentStore>(
    store: &S,
    request: &CreateScholarshipRequest,
    now: DateTime<Utc>,
) -> Result<Scholarship, AppError> {
    let scholarship = Scholarship {
        id: Uuid::new_v4().to_string(),
        name: request.name.trim().to_string(),
        gender: request.gender.clone().unwrap_or_else(|| "Any".to_string()),
        education: request.education.clone().unwrap_or_default(),
        category: request
            .category
            .clone()
            .unwrap_or_else(|| "Any".to_string()),
        state: request.state.clone().unwrap_or_else(|| "All".to_string()),
        max_income: request.max_income,
        min_percentage: request.min_percentage.unwrap_or(0),
        religion: request
            .religion
            .clone()
            .unwrap_or_else(|| "Any".to_string()),
        disability: request
            .disability
            .clone()
            .unwrap_or_else(|| "Any".to_string()),
        deadline: request.deadline.clone(),
        amount: request.amount.clone(),
        apply_link: request.apply_link.clone(),
        created_at: Some(now),
    };

    store
        .set(COLLECTION, &scholarship.id, serde_json::to_value(&scholarship)?)
        .await?;

    Ok(scholarship)
}

pub async fn get_scholarship<S: DocumentStore>(
    store: &S,
    id: &str,
) -> Result<Option<Scholarship>, AppError> {
    store
        .get(COLLECTION, id)
        .await?
        .map(|doc| serde_json::from_value(doc).map_err(AppError::from))
        .transpose()
}

/// Every stored scholarship. Documents that no longer deserialize are skipped
/// with a warning rather than failing the whole listing.
pub async fn list_scholarships<S: DocumentStore>(store: &S) -> Result<Vec<Scholarship>, AppError> {
    let docs = store.stream_all(COLLECTION).await?;
    Ok(super::decode_documents(docs, COLLECTION))
}
