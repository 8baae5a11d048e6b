use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::ids::TaskId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("task id cannot be empty")]
    EmptyTaskId,

    #[error("task label cannot be empty")]
    EmptyLabel,

    #[error("task group cannot be empty")]
    EmptyGroup,

    #[error("duplicate task id: {0}")]
    DuplicateTaskId(String),
}

//
// ─── TASK DEFINITION ───────────────────────────────────────────────────────────
//

/// A single checklist item, fixed at process start.
///
/// Every task belongs to exactly one named group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    id: TaskId,
    label: String,
    group: String,
}

impl TaskDefinition {
    /// Creates a new task definition.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the id, label, or group is empty or
    /// whitespace-only.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        group: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CatalogError::EmptyTaskId);
        }
        let label = label.into();
        if label.trim().is_empty() {
            return Err(CatalogError::EmptyLabel);
        }
        let group = group.into();
        if group.trim().is_empty() {
            return Err(CatalogError::EmptyGroup);
        }

        Ok(Self {
            id: TaskId::new(id.trim()),
            label: label.trim().to_owned(),
            group: group.trim().to_owned(),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// The fixed, ordered list of checklist tasks.
///
/// Group display order is the order of first occurrence in the task
/// sequence. Task ids are unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    tasks: Vec<TaskDefinition>,
    group_order: Vec<String>,
}

impl Catalog {
    /// Creates a catalog from an ordered task list.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateTaskId` if two tasks share an id.
    pub fn new(tasks: Vec<TaskDefinition>) -> Result<Self, CatalogError> {
        let mut seen: BTreeSet<&TaskId> = BTreeSet::new();
        let mut group_order: Vec<String> = Vec::new();

        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(CatalogError::DuplicateTaskId(task.id().as_str().to_owned()));
            }
            if !group_order.iter().any(|g| g == task.group()) {
                group_order.push(task.group().to_owned());
            }
        }

        Ok(Self { tasks, group_order })
    }

    /// All tasks in catalog order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskDefinition] {
        &self.tasks
    }

    /// Number of tasks in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Group names in first-occurrence order.
    #[must_use]
    pub fn group_names(&self) -> &[String] {
        &self.group_order
    }

    /// Tasks of one group, in catalog order. `group` must be the canonical
    /// name; use [`Catalog::resolve_group`] for inbound keys.
    pub fn tasks_in_group<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'a TaskDefinition> {
        self.tasks.iter().filter(move |t| t.group() == group)
    }

    /// Ids of one group's tasks.
    #[must_use]
    pub fn group_task_ids(&self, group: &str) -> BTreeSet<TaskId> {
        self.tasks_in_group(group).map(|t| t.id().clone()).collect()
    }

    /// Matches an inbound group key case-insensitively against catalog
    /// group names, returning the canonical name.
    #[must_use]
    pub fn resolve_group(&self, key: &str) -> Option<&str> {
        self.group_order
            .iter()
            .map(String::as_str)
            .find(|g| g.eq_ignore_ascii_case(key))
    }

    /// Whether the catalog defines the given task id.
    #[must_use]
    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|t| t.id() == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, group: &str) -> TaskDefinition {
        TaskDefinition::new(id, format!("Task {id}"), group).unwrap()
    }

    #[test]
    fn task_definition_rejects_blank_fields() {
        assert_eq!(
            TaskDefinition::new("  ", "Label", "G").unwrap_err(),
            CatalogError::EmptyTaskId
        );
        assert_eq!(
            TaskDefinition::new("id", "   ", "G").unwrap_err(),
            CatalogError::EmptyLabel
        );
        assert_eq!(
            TaskDefinition::new("id", "Label", "").unwrap_err(),
            CatalogError::EmptyGroup
        );
    }

    #[test]
    fn task_definition_trims_fields() {
        let t = TaskDefinition::new(" nda ", "  Sign NDA  ", " Paperwork ").unwrap();
        assert_eq!(t.id().as_str(), "nda");
        assert_eq!(t.label(), "Sign NDA");
        assert_eq!(t.group(), "Paperwork");
    }

    #[test]
    fn catalog_rejects_duplicate_ids() {
        let err = Catalog::new(vec![task("a", "G1"), task("a", "G2")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateTaskId("a".into()));
    }

    #[test]
    fn group_order_follows_first_occurrence() {
        let catalog = Catalog::new(vec![
            task("a1", "A"),
            task("b1", "B"),
            task("a2", "A"),
            task("c1", "C"),
        ])
        .unwrap();
        assert_eq!(catalog.group_names(), ["A", "B", "C"]);
    }

    #[test]
    fn group_task_ids_collects_only_members() {
        let catalog = Catalog::new(vec![task("a1", "A"), task("b1", "B"), task("a2", "A")]).unwrap();
        let ids = catalog.group_task_ids("A");
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&TaskId::new("a1")));
        assert!(ids.contains(&TaskId::new("a2")));
    }

    #[test]
    fn resolve_group_is_case_insensitive() {
        let catalog = Catalog::new(vec![task("a1", "Paperwork")]).unwrap();
        assert_eq!(catalog.resolve_group("paperwork"), Some("Paperwork"));
        assert_eq!(catalog.resolve_group("PAPERWORK"), Some("Paperwork"));
        assert_eq!(catalog.resolve_group("payroll"), None);
    }

    #[test]
    fn empty_catalog_is_valid() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.group_names().is_empty());
    }
}
