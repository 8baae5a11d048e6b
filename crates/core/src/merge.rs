//! The group-scoped completion merge.

use std::collections::BTreeSet;

use crate::model::{Catalog, TaskId};

/// Replaces one group's completion state while leaving every other group's
/// stored state untouched.
///
/// A toggle reports only the acting group's currently selected values, so
/// the full completed set has to be rebuilt before it can be written back:
/// everything outside the group is kept as-is, and everything inside the
/// group is replaced by the reported selection. Selected ids that do not
/// belong to the group are dropped.
#[must_use]
pub fn merge_group_selection(
    catalog: &Catalog,
    group: &str,
    current: &BTreeSet<TaskId>,
    selected: &BTreeSet<TaskId>,
) -> BTreeSet<TaskId> {
    let group_ids = catalog.group_task_ids(group);

    let mut merged: BTreeSet<TaskId> = current.difference(&group_ids).cloned().collect();
    merged.extend(selected.intersection(&group_ids).cloned());
    merged
}
