use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{NewUser, Session, User};
use crate::error::AppError;
use crate::store::MemoryStore;

impl User {
    /// Find a user by (normalized) email.
    pub async fn find_by_email(store: &MemoryStore, email: &str) -> Option<User> {
        store.read().await.users.get(email).cloned()
    }

    /// Insert a new user together with its empty project list.
    pub async fn create(store: &MemoryStore, new: NewUser) -> Result<User, AppError> {
        let mut tables = store.write().await;
        if tables.users.contains_key(&new.email) {
            return Err(AppError::EmailTaken);
        }
        let user = User {
            name: new.name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.insert(user.email.clone(), user.clone());
        tables.projects.entry(user.email.clone()).or_default();
        Ok(user)
    }
}

impl Session {
    /// Open a session for `email` under a fresh random id.
    pub async fn create(store: &MemoryStore, email: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
        };
        store
            .write()
            .await
            .sessions
            .insert(session.id.clone(), session.email.clone());
        session
    }

    pub async fn find_email(store: &MemoryStore, id: &str) -> Option<String> {
        store.read().await.sessions.get(id).cloned()
    }

    /// Returns whether a session was actually removed.
    pub async fn delete(store: &MemoryStore, id: &str) -> bool {
        store.write().await.sessions.remove(id).is_some()
    }
}
