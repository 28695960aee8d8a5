use tracing::info;

use crate::{
    auth::{
        repo_types::{NewUser, User},
        services::hash_password,
    },
    error::AppError,
    projects::repo_types::{NewProject, Project},
    store::MemoryStore,
};

pub const DEMO_NAME: &str = "Asha Dev";
pub const DEMO_EMAIL: &str = "asha@example.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Demo account with two projects so a fresh server has something to show.
pub async fn seed_demo(store: &MemoryStore) -> Result<User, AppError> {
    let user = User::create(
        store,
        NewUser {
            name: DEMO_NAME.into(),
            email: DEMO_EMAIL.into(),
            password_hash: hash_password(DEMO_PASSWORD)?,
        },
    )
    .await?;

    Project::append_all(
        store,
        &user,
        vec![
            NewProject {
                title: "Neon Notes".into(),
                description: "A colorful note-taking demo".into(),
                tech_stack: "Java, CSS, HTML".into(),
            },
            NewProject {
                title: "Glide UI".into(),
                description: "CSS-first UI with glass + neon".into(),
                tech_stack: "HTML, CSS".into(),
            },
        ],
    )
    .await;

    info!(email = DEMO_EMAIL, "demo user seeded");
    Ok(user)
}
