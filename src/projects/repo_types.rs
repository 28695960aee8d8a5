use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub tech_stack: String,
    pub owner: String, // owner's display name
    pub created_at: OffsetDateTime,
}

impl Project {
    pub fn created_on(&self) -> Date {
        self.created_at.date()
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub tech_stack: String,
}
