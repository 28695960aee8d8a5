use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::projects::repo_types::{NewProject, Project};
use crate::store::MemoryStore;

impl Project {
    /// Projects owned by `email`, newest first.
    pub async fn list_by_owner(store: &MemoryStore, email: &str) -> Vec<Project> {
        store
            .read()
            .await
            .projects
            .get(email)
            .cloned()
            .unwrap_or_default()
    }

    /// Prepend a new project to `owner`'s list.
    pub async fn create(store: &MemoryStore, owner: &User, new: NewProject) -> Project {
        let project = Project {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            tech_stack: new.tech_stack,
            owner: owner.name.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        store
            .write()
            .await
            .projects
            .entry(owner.email.clone())
            .or_default()
            .insert(0, project.clone());
        project
    }

    /// Append in the given order; used when seeding so the list reads top to bottom as written.
    pub async fn append_all(store: &MemoryStore, owner: &User, items: Vec<NewProject>) {
        let now = OffsetDateTime::now_utc();
        let mut tables = store.write().await;
        let list = tables.projects.entry(owner.email.clone()).or_default();
        for new in items {
            list.push(Project {
                id: Uuid::new_v4(),
                title: new.title,
                description: new.description,
                tech_stack: new.tech_stack,
                owner: owner.name.clone(),
                created_at: now,
            });
        }
    }
}
