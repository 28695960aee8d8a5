use serde::Deserialize;

/// `POST /projects` form body. Field names match the HTML form.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProjectForm {
    pub title: String,
    #[serde(rename = "techStack")]
    pub tech_stack: String,
    pub description: String,
}
