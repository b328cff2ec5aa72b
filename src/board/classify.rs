use std::collections::HashMap;

use tracing::debug;

use super::cycle_index::CycleIndex;
use crate::model::board::{ClassifiedIssue, CycleStatus};
use crate::model::tracker::{Issue, IssueRef, NamedRef};

const NO_STATUS: &str = "No Status";

/// Workflow state and label names keyed by id, consulted only when the
/// issue itself does not carry the name.
#[derive(Debug, Default)]
pub struct Lookups {
    states: HashMap<String, String>,
    labels: HashMap<String, String>,
}

impl Lookups {
    pub fn new(states: Vec<NamedRef>, labels: Vec<NamedRef>) -> Self {
        Self {
            states: states.into_iter().map(|s| (s.id, s.name)).collect(),
            labels: labels.into_iter().map(|l| (l.id, l.name)).collect(),
        }
    }

    fn state_name(&self, state: Option<&IssueRef>) -> String {
        state
            .and_then(|s| resolve(s, &self.states))
            .unwrap_or_else(|| NO_STATUS.to_string())
    }

    fn label_names(&self, labels: &[IssueRef]) -> Vec<String> {
        labels
            .iter()
            .filter_map(|l| resolve(l, &self.labels))
            .collect()
    }
}

fn resolve(item: &IssueRef, names: &HashMap<String, String>) -> Option<String> {
    item.name
        .clone()
        .or_else(|| names.get(&item.id).cloned())
}

/// Returns None for backlog issues and for issues whose cycle is not indexed.
pub fn classify(issue: &Issue, index: &CycleIndex, lookups: &Lookups) -> Option<ClassifiedIssue> {
    let Some(cycle_id) = issue.cycle_id.as_deref() else {
        debug!(issue = %issue.identifier, "excluding backlog issue");
        return None;
    };
    let Some(info) = index.cycle(cycle_id) else {
        debug!(issue = %issue.identifier, cycle = cycle_id, "excluding issue with unknown cycle");
        return None;
    };

    let team_active = index.active_cycle_number(&issue.team_id);
    let status = match team_active {
        _ if info.is_active => CycleStatus::Current,
        Some(active) if info.number > active => CycleStatus::Future,
        Some(active) if info.number < active => CycleStatus::Past,
        // No active cycle known for this team; falls back to current.
        _ => CycleStatus::Current,
    };

    Some(ClassifiedIssue {
        id: issue.id.clone(),
        identifier: issue.identifier.clone(),
        title: issue.title.clone(),
        priority: issue.priority,
        priority_label: issue.priority_label.clone(),
        status: lookups.state_name(issue.state.as_ref()),
        url: issue.url.clone(),
        cycle_number: Some(info.number),
        cycle_status: Some(status),
        due_date: issue.due_date.clone(),
        labels: lookups.label_names(&issue.labels),
    })
}
