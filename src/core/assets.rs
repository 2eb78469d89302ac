//! Embedded document templates.
//!
//! Default templates are baked into the binary so a fresh checkout needs no
//! external files. A project can override any template by placing a file of
//! the same name under `<planning_root>/templates/`.

use crate::core::config::Project;

macro_rules! embedded_templates {
    ($($name:expr => $const_name:ident),* $(,)?) => {
        $(
            pub const $const_name: &str =
                include_str!(concat!("../../templates/", $name));
        )*

        pub fn get_embedded_template(name: &str) -> Option<&'static str> {
            match name {
                $( $name => Some($const_name), )*
                _ => None,
            }
        }

        pub fn list_templates() -> Vec<&'static str> {
            vec![ $( $name, )* ]
        }
    };
}

embedded_templates! {
    "adr.md" => TEMPLATE_ADR,
    "fdp.md" => TEMPLATE_FDP,
    "action-plan.md" => TEMPLATE_ACTION_PLAN,
    "report.md" => TEMPLATE_REPORT,
    "roadmap.md" => TEMPLATE_ROADMAP,
}

/// Resolve a template: project override first, embedded default second.
pub fn get_template(project: &Project, name: &str) -> Option<String> {
    let override_path = project.planning_root().join("templates").join(name);
    if let Ok(content) = std::fs::read_to_string(&override_path) {
        return Some(content);
    }
    get_embedded_template(name).map(str::to_string)
}

/// Substitute `{NUMBER}`, `{TITLE}`, and `{DATE}` template variables.
/// Placeholders that are not supplied stay verbatim; unknown placeholders
/// are never an error.
pub fn substitute(template: &str, number: &str, title: &str, date: &str) -> String {
    template
        .replace("{NUMBER}", number)
        .replace("{TITLE}", title)
        .replace("{DATE}", date)
}
