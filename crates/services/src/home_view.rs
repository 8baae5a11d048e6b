//! The home-view builder.
//!
//! Pure and I/O-free: the document is rebuilt from the catalog and a
//! freshly read completed set on every interaction, and published
//! wholesale by the adapter.

use std::collections::BTreeSet;

use serde::Serialize;

use onboard_core::model::{Catalog, Resources, TaskDefinition, TaskId};

use crate::events::TOGGLE_ACTION_PREFIX;

/// Header line shown at the top of the checklist.
pub const HEADER_TEXT: &str = "TMS Onboarding Checklist";

/// Welcome/explanation line under the header.
pub const WELCOME_TEXT: &str = "Welcome to The Movement Street. Check items as you complete \
     them. Your progress saves automatically.";

/// One selectable task inside a checkbox control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOption {
    pub label: String,
    pub value: String,
}

impl CheckOption {
    fn from_task(task: &TaskDefinition) -> Self {
        Self {
            label: task.label().to_owned(),
            value: task.id().as_str().to_owned(),
        }
    }
}

/// Interactive multi-select control for one group.
///
/// `initial_options` is omitted entirely when no task in the group is done:
/// the downstream rendering sink rejects an empty pre-checked list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxGroup {
    pub action_id: String,
    pub options: Vec<CheckOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_options: Option<Vec<CheckOption>>,
}

/// One group subsection: heading with counts plus its control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSection {
    pub heading: String,
    pub checkboxes: CheckboxGroup,
}

/// Render-agnostic home document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewDocument {
    pub header: String,
    pub welcome: String,
    pub progress: String,
    pub sections: Vec<GroupSection>,
    pub resources: String,
}

/// Builds the home document for one user's completed set.
///
/// Deterministic: the same inputs always produce the same document. An
/// empty catalog yields only the header, welcome, a `0/0 completed`
/// progress line, and the resources footer.
#[must_use]
pub fn build_home_view(
    catalog: &Catalog,
    resources: &Resources,
    completed: &BTreeSet<TaskId>,
) -> ViewDocument {
    let done_count = catalog
        .tasks()
        .iter()
        .filter(|t| completed.contains(t.id()))
        .count();

    let mut sections = Vec::with_capacity(catalog.group_names().len());
    for group in catalog.group_names() {
        let tasks: Vec<&TaskDefinition> = catalog.tasks_in_group(group).collect();
        let group_done = tasks.iter().filter(|t| completed.contains(t.id())).count();

        let options = tasks.iter().copied().map(CheckOption::from_task).collect();
        let initial: Vec<CheckOption> = tasks
            .iter()
            .copied()
            .filter(|t| completed.contains(t.id()))
            .map(CheckOption::from_task)
            .collect();

        sections.push(GroupSection {
            heading: format!("{group} ({group_done}/{})", tasks.len()),
            checkboxes: CheckboxGroup {
                action_id: format!("{TOGGLE_ACTION_PREFIX}{}", group.to_lowercase()),
                options,
                initial_options: if initial.is_empty() {
                    None
                } else {
                    Some(initial)
                },
            },
        });
    }

    ViewDocument {
        header: HEADER_TEXT.to_owned(),
        welcome: WELCOME_TEXT.to_owned(),
        progress: format!("{done_count}/{} completed", catalog.len()),
        sections,
        resources: resources_line(resources),
    }
}

fn resources_line(resources: &Resources) -> String {
    let parts = [
        resources.all_team_channel.to_owned(),
        resources.announcements_channel.to_owned(),
        format!("<{}|Handbook>", resources.handbook_url),
        format!("<{}|Brand Center>", resources.brand_center_url),
        format!("<{}|PD Recordings>", resources.pd_recordings_url),
        format!("<{}|Staff Directory>", resources.staff_directory_url),
    ];
    format!("Resources: {}", parts.join(" • "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::model::TaskDefinition;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            TaskDefinition::new("a1", "A one", "A").unwrap(),
            TaskDefinition::new("a2", "A two", "A").unwrap(),
            TaskDefinition::new("b1", "B one", "B").unwrap(),
        ])
        .unwrap()
    }

    fn resources() -> Resources {
        Resources {
            handbook_url: "https://example.com/handbook",
            brand_center_url: "https://example.com/brand",
            pd_recordings_url: "https://example.com/pd",
            staff_directory_url: "https://example.com/staff",
            all_team_channel: "<#all-team>",
            announcements_channel: "<#announcements>",
            admin_email: "admin@example.com",
        }
    }

    fn ids(raw: &[&str]) -> BTreeSet<TaskId> {
        raw.iter().copied().map(TaskId::new).collect()
    }

    #[test]
    fn render_is_deterministic() {
        let catalog = catalog();
        let completed = ids(&["a1"]);
        let first = build_home_view(&catalog, &resources(), &completed);
        let second = build_home_view(&catalog, &resources(), &completed);
        assert_eq!(first, second);
    }

    #[test]
    fn progress_and_group_counts() {
        let view = build_home_view(&catalog(), &resources(), &ids(&["a1", "b1"]));
        assert_eq!(view.progress, "2/3 completed");
        assert_eq!(view.sections.len(), 2);
        assert_eq!(view.sections[0].heading, "A (1/2)");
        assert_eq!(view.sections[1].heading, "B (1/1)");
    }

    #[test]
    fn fully_completed_group_lists_every_task() {
        let view = build_home_view(&catalog(), &resources(), &ids(&["a1", "a2"]));
        let section = &view.sections[0];
        assert_eq!(section.heading, "A (2/2)");
        assert_eq!(section.checkboxes.options.len(), 2);
        let initial = section.checkboxes.initial_options.as_ref().unwrap();
        assert_eq!(initial.len(), 2);
    }

    #[test]
    fn empty_group_selection_omits_initial_options_entirely() {
        let view = build_home_view(&catalog(), &resources(), &ids(&[]));
        for section in &view.sections {
            assert!(section.checkboxes.initial_options.is_none());
        }

        // The serialized control must not carry the field at all.
        let json = serde_json::to_value(&view).unwrap();
        let control = &json["sections"][0]["checkboxes"];
        assert!(control.get("initial_options").is_none());
        assert_eq!(control["action_id"], "task_toggle_a");
    }

    #[test]
    fn empty_catalog_renders_header_and_zero_progress() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        let view = build_home_view(&catalog, &resources(), &ids(&[]));
        assert_eq!(view.progress, "0/0 completed");
        assert!(view.sections.is_empty());
        assert_eq!(view.header, HEADER_TEXT);
    }

    #[test]
    fn resources_footer_joins_links_with_separator() {
        let view = build_home_view(&catalog(), &resources(), &ids(&[]));
        assert!(view.resources.starts_with("Resources: <#all-team> • <#announcements>"));
        assert!(view.resources.contains("<https://example.com/handbook|Handbook>"));
        assert!(view.resources.ends_with("<https://example.com/staff|Staff Directory>"));
    }

    #[test]
    fn completed_ids_outside_the_catalog_do_not_inflate_group_counts() {
        let view = build_home_view(&catalog(), &resources(), &ids(&["a1", "ghost"]));
        assert_eq!(view.sections[0].heading, "A (1/2)");
        assert_eq!(view.sections[1].heading, "B (0/1)");
    }
}
