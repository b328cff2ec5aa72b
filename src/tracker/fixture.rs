use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{Tracker, TrackerFactory};
use crate::model::tracker::{Cycle, Issue, IssueRef, NamedRef, Team, Viewer};

/// In-memory tracker used in place of the network.
#[derive(Clone, Default)]
pub struct FixtureTracker {
    pub viewer_name: String,
    pub teams: Vec<(Team, Vec<Cycle>)>,
    /// Active cycles returned only by the active-only query, keyed by team.
    pub active_outside_page: Vec<(String, Cycle)>,
    pub issues: Vec<Issue>,
    pub states: Vec<NamedRef>,
    pub labels: Vec<NamedRef>,
    pub fail_on: Option<&'static str>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FixtureTracker {
    pub fn new(viewer_name: &str) -> Self {
        Self {
            viewer_name: viewer_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_team(mut self, team_id: &str, cycles: Vec<Cycle>) -> Self {
        self.teams.push((
            Team {
                id: team_id.to_string(),
            },
            cycles,
        ));
        self
    }

    /// A team whose active cycle is missing from the page of all cycles.
    pub fn with_team_active_outside_page(
        mut self,
        team_id: &str,
        cycles: Vec<Cycle>,
        active: Cycle,
    ) -> Self {
        self.active_outside_page.push((team_id.to_string(), active));
        self.with_team(team_id, cycles)
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    pub fn with_state(mut self, id: &str, name: &str) -> Self {
        self.states.push(named(id, name));
        self
    }

    pub fn with_label(mut self, id: &str, name: &str) -> Self {
        self.labels.push(named(id, name));
        self
    }

    pub fn failing_on(mut self, call: &'static str) -> Self {
        self.fail_on = Some(call);
        self
    }

    fn record(&self, call: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call.to_string());
        if self.fail_on == Some(call) {
            bail!("fixture failure in {call}");
        }
        Ok(())
    }
}

#[async_trait]
impl Tracker for FixtureTracker {
    async fn viewer(&self) -> Result<Viewer> {
        self.record("viewer")?;
        Ok(Viewer {
            id: "viewer-1".into(),
            name: self.viewer_name.clone(),
        })
    }

    async fn teams(&self) -> Result<Vec<Team>> {
        self.record("teams")?;
        Ok(self.teams.iter().map(|(t, _)| t.clone()).collect())
    }

    async fn cycles(&self, team_id: &str, active_only: bool) -> Result<Vec<Cycle>> {
        self.record("cycles")?;
        let cycles = self
            .teams
            .iter()
            .find(|(t, _)| t.id == team_id)
            .map(|(_, c)| c.clone())
            .unwrap_or_default();
        let mut cycles: Vec<Cycle> = cycles
            .into_iter()
            .filter(|c| !active_only || c.is_active)
            .collect();
        if active_only {
            cycles.extend(
                self.active_outside_page
                    .iter()
                    .filter(|(t, _)| t == team_id)
                    .map(|(_, c)| c.clone()),
            );
        }
        Ok(cycles)
    }

    async fn assigned_issues(&self, _viewer_id: &str) -> Result<Vec<Issue>> {
        self.record("issues")?;
        Ok(self.issues.clone())
    }

    async fn workflow_states(&self) -> Result<Vec<NamedRef>> {
        self.record("states")?;
        Ok(self.states.clone())
    }

    async fn labels(&self) -> Result<Vec<NamedRef>> {
        self.record("labels")?;
        Ok(self.labels.clone())
    }
}

/// Hands out the same fixture for every key and remembers which keys it saw.
pub struct FixtureFactory {
    pub tracker: FixtureTracker,
    pub keys: Arc<Mutex<Vec<String>>>,
}

impl FixtureFactory {
    pub fn new(tracker: FixtureTracker) -> Self {
        Self {
            tracker,
            keys: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl TrackerFactory for FixtureFactory {
    fn connect(&self, api_key: &str) -> Arc<dyn Tracker> {
        self.keys.lock().unwrap().push(api_key.to_string());
        Arc::new(self.tracker.clone())
    }
}

pub fn named(id: &str, name: &str) -> NamedRef {
    NamedRef {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn issue_ref(id: &str, name: Option<&str>) -> IssueRef {
    IssueRef {
        id: id.to_string(),
        name: name.map(String::from),
    }
}

pub fn cycle(id: &str, number: u32, is_active: bool) -> Cycle {
    Cycle {
        id: id.to_string(),
        number,
        is_active,
    }
}

pub fn issue(id: &str, team_id: &str, cycle_id: Option<&str>, priority: u8) -> Issue {
    Issue {
        id: format!("uuid-{id}"),
        identifier: id.to_string(),
        title: format!("Issue {id}"),
        priority,
        priority_label: match priority {
            1 => "Urgent",
            2 => "High",
            3 => "Medium",
            4 => "Low",
            _ => "No priority",
        }
        .to_string(),
        url: format!("https://linear.app/acme/issue/{id}"),
        due_date: None,
        team_id: team_id.to_string(),
        cycle_id: cycle_id.map(String::from),
        state: None,
        labels: vec![],
    }
}
