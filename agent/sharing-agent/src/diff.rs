/*!

Pure helpers that compare a resource's remote project list with the desired one. Nothing in here
talks to the platform.

!*/

use crate::provider::{ErrorKind, RemoteState, ShareError, ShareResult};
use sharing_model::{ProjectMeta, ShareableResource};
use std::collections::HashSet;

/// The remote project ids of `resource` without the owner, de-duplicated, in remote order.
pub fn current_projects(resource: &ShareableResource, owner: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    resource
        .projects
        .iter()
        .map(|p| p.project_id.as_str())
        .filter(|id| *id != owner && seen.insert(*id))
        .map(str::to_string)
        .collect()
}

/// The desired projects without the owner, de-duplicated by id, in desired order.
pub fn desired_projects(desired: &[ProjectMeta], owner: &str) -> Vec<ProjectMeta> {
    let mut seen = HashSet::new();
    desired
        .iter()
        .filter(|p| p.id != owner && seen.insert(p.id.as_str()))
        .cloned()
        .collect()
}

/// Orders `current` so that projects named in `previous` come first, in `previous` order, and the
/// rest follow in their remote order. Duplicates collapse to their first occurrence.
///
/// ```
/// # use sharing_agent::diff::sort_current;
/// # use sharing_model::ProjectMeta;
/// let current = vec![
///     ProjectMeta::new("a", "A"),
///     ProjectMeta::new("b", "B"),
///     ProjectMeta::new("c", "C"),
/// ];
/// let previous = vec![ProjectMeta::named("C"), ProjectMeta::named("A")];
/// let sorted: Vec<_> = sort_current(current, &previous)
///     .into_iter()
///     .map(|p| p.name)
///     .collect();
/// assert_eq!(sorted, vec!["C", "A", "B"]);
/// ```
pub fn sort_current(current: Vec<ProjectMeta>, previous: &[ProjectMeta]) -> Vec<ProjectMeta> {
    let mut remaining = dedup(current);
    let mut sorted = Vec::with_capacity(remaining.len());
    for wanted in previous {
        if let Some(position) = remaining.iter().position(|p| same_project(p, wanted)) {
            sorted.push(remaining.remove(position));
        }
    }
    sorted.extend(remaining);
    sorted
}

/// Ids compare when both sides have one, names otherwise.
fn same_project(a: &ProjectMeta, b: &ProjectMeta) -> bool {
    if a.is_resolved() && b.is_resolved() {
        a.id == b.id
    } else {
        a.name == b.name
    }
}

fn dedup(projects: Vec<ProjectMeta>) -> Vec<ProjectMeta> {
    let mut out: Vec<ProjectMeta> = Vec::with_capacity(projects.len());
    for project in projects {
        if !out.iter().any(|p| same_project(p, &project)) {
            out.push(project);
        }
    }
    out
}

/// The projects to assign and to unassign to get from the current list to the desired one.
/// `new_ids` and `old_ids` are disjoint and never contain the owner.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SharingDiff {
    pub new_ids: Vec<String>,
    pub old_ids: Vec<String>,
}

impl SharingDiff {
    /// Every desired project must carry an id by now. The error names the first one that does
    /// not.
    pub fn compute(
        current: &[String],
        desired: &[ProjectMeta],
        owner: &str,
    ) -> ShareResult<Self> {
        if let Some(project) = desired.iter().find(|p| !p.is_resolved()) {
            return Err(ShareError::new_with_context(
                ErrorKind::Resolution,
                RemoteState::Untouched,
                format!("project '{}' has not been resolved to an id", project.name),
            ));
        }
        if current.iter().any(String::is_empty) {
            return Err(ShareError::new_with_context(
                ErrorKind::Resolution,
                RemoteState::Untouched,
                "a project the resource is shared with has an empty id",
            ));
        }
        let desired: Vec<String> = desired.iter().map(|p| p.id.clone()).collect();
        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
        let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();
        Ok(Self {
            new_ids: ordered_difference(&desired, &current_set, owner),
            old_ids: ordered_difference(current, &desired_set, owner),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.new_ids.is_empty() && self.old_ids.is_empty()
    }
}

/// Entries of `ids` that are not in `other` and are not `owner`, first occurrence only.
fn ordered_difference(ids: &[String], other: &HashSet<&str>, owner: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| *id != owner && !other.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}
