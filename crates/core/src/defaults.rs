//! The shipped catalog and resources map.
//!
//! Both are compiled-in constants: changing the task list is a deploy-time
//! change, and stored rows for removed ids are left in place.

use crate::model::{Catalog, Resources, TaskDefinition};

/// Greeting the adapter may send once when a member joins the workspace.
/// Sending it is entirely the adapter's side effect.
pub const WELCOME_GREETING: &str = "Welcome to The Movement Street. Open the app's *Home* tab \
     to see your onboarding checklist. If you have questions, reply here.";

/// Returns the shipped resources map.
#[must_use]
pub fn default_resources() -> Resources {
    Resources {
        handbook_url: "https://docs.google.com/document/d/1711C6vSp4r4EHZw5MbgYuy-LkxrPF-2o69fHCCgU0fQ/edit?usp=sharing",
        brand_center_url: "https://drive.google.com/file/d/1hTp4w1ufmJVgNkzYxsOLjcdI9kBvro1X/view?usp=sharing",
        pd_recordings_url: "https://drive.google.com/drive/folders/1VkBMVvdlG0IofZ7_RKB4dMT0aXEzsxew?usp=drive_link",
        staff_directory_url: "https://docs.google.com/spreadsheets/d/1_7uLjg20Oy-ajgQCVdtozPTiWnO5pgdniR3lpKqRjw0/edit?usp=sharing",
        all_team_channel: "<#allthemovementstreet>",
        announcements_channel: "<#announcements>",
        admin_email: "admin@themovementstreet.org",
    }
}

fn task(id: &str, label: impl Into<String>, group: &str) -> TaskDefinition {
    TaskDefinition::new(id, label, group).expect("shipped task definitions are valid")
}

/// Returns the shipped onboarding catalog: four groups, fifteen tasks.
///
/// # Panics
///
/// Panics if the compiled-in task list fails validation, which would be a
/// bug in this module.
#[must_use]
pub fn default_catalog() -> Catalog {
    let admin_email = default_resources().admin_email;

    let tasks = vec![
        // Step 1: Paperwork & Documents
        task("welcome_letter", "Sign Welcome Letter", "Paperwork"),
        task("nda", "Sign NDA", "Paperwork"),
        task("offer_letter", "Sign Offer Letter", "Paperwork"),
        task("volunteer_agreement", "Sign Volunteer Agreement", "Paperwork"),
        task(
            "contract",
            "Sign Contract (duties and responsibilities)",
            "Paperwork",
        ),
        task(
            "upload_docs",
            format!("Upload docs & share with {admin_email}"),
            "Paperwork",
        ),
        // Step 2: Onboarding & Integration
        task("staff_directory", "Review Staff Directory", "Integration"),
        task("chapter_handbook", "Read Chapter Handbook", "Integration"),
        task("brand_center", "Explore Brand Center", "Integration"),
        task(
            "pd_recordings",
            "Watch Professional Development Recordings",
            "Integration",
        ),
        // Step 3: Workflow & Role Setup
        task(
            "role_checklist",
            "Review your role-specific checklist",
            "Workflow",
        ),
        task(
            "setup_workflow",
            "Set up your role workflows and tools",
            "Workflow",
        ),
        // Step 4: Connection & Culture
        task("coffee_chat_1", "Coffee Chat #1 with a TMS team member", "Culture"),
        task("coffee_chat_2", "Coffee Chat #2 with a TMS team member", "Culture"),
        task("coffee_chat_3", "Coffee Chat #3 with a TMS team member", "Culture"),
    ];

    Catalog::new(tasks).expect("shipped catalog is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_catalog_has_four_groups_in_order() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 15);
        assert_eq!(
            catalog.group_names(),
            ["Paperwork", "Integration", "Workflow", "Culture"]
        );
    }

    #[test]
    fn upload_docs_label_names_the_admin_contact() {
        let catalog = default_catalog();
        let upload = catalog
            .tasks()
            .iter()
            .find(|t| t.id().as_str() == "upload_docs")
            .unwrap();
        assert!(upload.label().contains(default_resources().admin_email));
    }

    #[test]
    fn shipped_group_sizes() {
        let catalog = default_catalog();
        assert_eq!(catalog.group_task_ids("Paperwork").len(), 6);
        assert_eq!(catalog.group_task_ids("Integration").len(), 4);
        assert_eq!(catalog.group_task_ids("Workflow").len(), 2);
        assert_eq!(catalog.group_task_ids("Culture").len(), 3);
    }
}
