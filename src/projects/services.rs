use crate::projects::repo_types::Project;
use crate::views::escape;

pub const EMPTY_DASHBOARD: &str = "<div class=\"empty\">No projects yet. Click <a href=\"/projects/new\">New Project</a> to add one.</div>";

/// Dashboard markup for `projects`, in list order.
pub fn project_cards(projects: &[Project]) -> String {
    if projects.is_empty() {
        return EMPTY_DASHBOARD.to_string();
    }
    projects.iter().map(project_card).collect()
}

fn project_card(p: &Project) -> String {
    format!(
        "<div class=\"card project-card\">\
         <h3>{}</h3>\
         <p class=\"meta\">{}</p>\
         <p>{}</p>\
         <div class=\"project-footer\"><span>{}</span></div>\
         </div>",
        escape(&p.title),
        escape(&p.tech_stack),
        escape(&p.description),
        p.created_on(),
    )
}
