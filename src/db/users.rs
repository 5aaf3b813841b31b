use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

use crate::core::AppError;
use crate::db::store::DocumentStore;
use crate::models::users::UserAccount;

const COLLECTION: &str = "users";

/// Creates an account keyed by the (already lowercased) email. Returns `None`
/// when an account with that email exists; the document identity is the
/// uniqueness guarantee, there is no separate check-then-insert.
pub async fn create_user<S: DocumentStore>(
    store: &S,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Option<UserAccount>, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::internal_error("Failed to hash password"))?
        .to_string();

    let account = UserAccount {
        email: email.to_string(),
        password_hash,
        role: "user".to_string(),
        created_at: now,
    };

    let created = store
        .insert_new(COLLECTION, email, serde_json::to_value(&account)?)
        .await?;

    Ok(created.then_some(account))
}

pub async fn email_exists<S: DocumentStore>(store: &S, email: &str) -> Result<bool, AppError> {
    Ok(store.get(COLLECTION, email).await?.is_some())
}

pub async fn find_user<S: DocumentStore>(
    store: &S,
    email: &str,
) -> Result<Option<UserAccount>, AppError> {
    store
        .get(COLLECTION, email)
        .await?
        .map(|doc| serde_json::from_value(doc).map_err(AppError::from))
        .transpose()
}

pub async fn list_users<S: DocumentStore>(store: &S) -> Result<Vec<UserAccount>, AppError> {
    let docs = store.stream_all(COLLECTION).await?;
    Ok(super::decode_documents(docs, COLLECTION))
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::internal_error("Invalid password"))?;

    let argon2 = Argon2::default();
    Ok(argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::MemoryStore;
    use claim::{assert_ok, assert_some};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;

    #[tokio::test]
    async fn second_registration_with_the_same_email_is_rejected() {
        let store = MemoryStore::new();
        let email: String = SafeEmail().fake::<String>().to_lowercase();

        let first = assert_ok!(create_user(&store, &email, "hunter22", Utc::now()).await);
        let second = assert_ok!(create_user(&store, &email, "other-pass", Utc::now()).await);

        assert!(first.is_some());
        assert!(second.is_none());
        assert!(assert_ok!(email_exists(&store, &email).await));
    }

    #[tokio::test]
    async fn stored_hash_verifies_the_original_password_only() {
        let store = MemoryStore::new();
        let email: String = SafeEmail().fake::<String>().to_lowercase();

        assert_some!(assert_ok!(
            create_user(&store, &email, "hunter22", Utc::now()).await
        ));
        let account = assert_some!(assert_ok!(find_user(&store, &email).await));

        assert!(assert_ok!(
            verify_password("hunter22", &account.password_hash).await
        ));
        assert!(!assert_ok!(
            verify_password("wrong", &account.password_hash).await
        ));
    }
}
