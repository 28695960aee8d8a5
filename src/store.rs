use std::collections::HashMap;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{auth::repo_types::User, projects::repo_types::Project};

/// The three in-memory maps. Keys are lower-cased emails except `sessions`,
/// which is keyed by session id.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: HashMap<String, User>,
    pub sessions: HashMap<String, String>,
    pub projects: HashMap<String, Vec<Project>>,
}

/// All tables sit behind one lock so that multi-map mutations are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }
}
