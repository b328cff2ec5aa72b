use std::sync::Arc;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tracker, TrackerFactory};
use crate::model::tracker::{Cycle, Issue, IssueRef, NamedRef, Team, Viewer};

pub const DEFAULT_ENDPOINT: &str = "https://api.linear.app/graphql";

pub struct LinearTracker {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl LinearTracker {
    pub fn new(api_key: String, endpoint: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            endpoint,
            client,
        }
    }

    async fn query<T: DeserializeOwned>(
        &self,
        name: &str,
        query: &str,
        variables: Value,
    ) -> Result<T> {
        let body = json!({ "query": query, "variables": variables });
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Linear {name} request failed"))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            bail!("Linear {name} returned {status}: {text}");
        }

        let gql: GqlResponse<T> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse Linear {name} response"))?;
        gql.into_data(name)
    }
}

/// Shares one HTTP connection pool across per-request trackers.
pub struct LinearFactory {
    endpoint: String,
    client: reqwest::Client,
}

impl LinearFactory {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

impl TrackerFactory for LinearFactory {
    fn connect(&self, api_key: &str) -> Arc<dyn Tracker> {
        Arc::new(LinearTracker::new(
            api_key.to_string(),
            self.endpoint.clone(),
            self.client.clone(),
        ))
    }
}

const VIEWER_QUERY: &str = "query { viewer { id name } }";

const TEAMS_QUERY: &str = "query { teams(first: 50) { nodes { id } } }";

const CYCLES_QUERY: &str = r#"query($teamId: String!) {
  team(id: $teamId) {
    cycles(first: 50) { nodes { id number } }
  }
}"#;

const ACTIVE_CYCLES_QUERY: &str = r#"query($teamId: String!) {
  team(id: $teamId) {
    cycles(first: 50, filter: { isActive: { eq: true } }) { nodes { id number } }
  }
}"#;

const ISSUES_QUERY: &str = r#"query($viewerId: ID!) {
  issues(
    filter: {
      assignee: { id: { eq: $viewerId } }
      state: { type: { nin: ["completed", "canceled"] } }
    }
    first: 50
  ) {
    nodes {
      id identifier title priority priorityLabel url dueDate
      team { id }
      cycle { id }
      state { id name }
      labels { nodes { id name } }
    }
  }
}"#;

const STATES_QUERY: &str = "query { workflowStates(first: 250) { nodes { id name } } }";

const LABELS_QUERY: &str = "query { issueLabels(first: 250) { nodes { id name } } }";

#[derive(Deserialize)]
struct GqlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GqlError>,
}

#[derive(Deserialize)]
struct GqlError {
    message: String,
}

impl<T> GqlResponse<T> {
    fn into_data(self, name: &str) -> Result<T> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            bail!("Linear {name} query failed: {}", messages.join("; "));
        }
        self.data
            .with_context(|| format!("No data in Linear {name} response"))
    }
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct IdNode {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ViewerData {
    viewer: ViewerNode,
}

#[derive(Debug, Deserialize)]
struct ViewerNode {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct TeamsData {
    teams: Connection<IdNode>,
}

#[derive(Deserialize)]
struct TeamCyclesData {
    team: TeamCycles,
}

#[derive(Deserialize)]
struct TeamCycles {
    cycles: Connection<CycleNode>,
}

// Linear exposes cycle numbers and priorities as GraphQL Floats.
#[derive(Deserialize)]
struct CycleNode {
    id: String,
    number: f64,
}

#[derive(Deserialize)]
struct IssuesData {
    issues: Connection<IssueNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueNode {
    id: String,
    identifier: String,
    title: String,
    priority: Option<f64>,
    priority_label: Option<String>,
    url: String,
    due_date: Option<String>,
    team: IdNode,
    cycle: Option<IdNode>,
    state: Option<RefNode>,
    labels: Option<Connection<RefNode>>,
}

#[derive(Deserialize)]
struct RefNode {
    id: String,
    name: Option<String>,
}

impl From<RefNode> for IssueRef {
    fn from(node: RefNode) -> Self {
        IssueRef {
            id: node.id,
            name: node.name,
        }
    }
}

#[derive(Deserialize)]
struct NamedNode {
    id: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatesData {
    workflow_states: Connection<NamedNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelsData {
    issue_labels: Connection<NamedNode>,
}

impl From<IssueNode> for Issue {
    fn from(node: IssueNode) -> Self {
        Issue {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            priority: node.priority.map(|p| p as u8).unwrap_or(0),
            priority_label: node.priority_label.unwrap_or_else(|| "No priority".into()),
            url: node.url,
            due_date: node.due_date,
            team_id: node.team.id,
            cycle_id: node.cycle.map(|c| c.id),
            state: node.state.map(IssueRef::from),
            labels: node
                .labels
                .map(|lc| lc.nodes.into_iter().map(IssueRef::from).collect())
                .unwrap_or_default(),
        }
    }
}

fn named_refs(conn: Connection<NamedNode>) -> Vec<NamedRef> {
    conn.nodes
        .into_iter()
        .map(|n| NamedRef {
            id: n.id,
            name: n.name,
        })
        .collect()
}

#[async_trait]
impl Tracker for LinearTracker {
    async fn viewer(&self) -> Result<Viewer> {
        let data: ViewerData = self.query("viewer", VIEWER_QUERY, json!({})).await?;
        Ok(Viewer {
            id: data.viewer.id,
            name: data.viewer.name,
        })
    }

    async fn teams(&self) -> Result<Vec<Team>> {
        let data: TeamsData = self.query("teams", TEAMS_QUERY, json!({})).await?;
        Ok(data
            .teams
            .nodes
            .into_iter()
            .map(|n| Team { id: n.id })
            .collect())
    }

    async fn cycles(&self, team_id: &str, active_only: bool) -> Result<Vec<Cycle>> {
        let query = if active_only {
            ACTIVE_CYCLES_QUERY
        } else {
            CYCLES_QUERY
        };
        let data: TeamCyclesData = self
            .query("cycles", query, json!({ "teamId": team_id }))
            .await?;
        Ok(data
            .team
            .cycles
            .nodes
            .into_iter()
            .map(|n| Cycle {
                id: n.id,
                number: n.number as u32,
                is_active: active_only,
            })
            .collect())
    }

    async fn assigned_issues(&self, viewer_id: &str) -> Result<Vec<Issue>> {
        let data: IssuesData = self
            .query("issues", ISSUES_QUERY, json!({ "viewerId": viewer_id }))
            .await?;
        Ok(data.issues.nodes.into_iter().map(Issue::from).collect())
    }

    async fn workflow_states(&self) -> Result<Vec<NamedRef>> {
        let data: StatesData = self.query("workflowStates", STATES_QUERY, json!({})).await?;
        Ok(named_refs(data.workflow_states))
    }

    async fn labels(&self) -> Result<Vec<NamedRef>> {
        let data: LabelsData = self.query("issueLabels", LABELS_QUERY, json!({})).await?;
        Ok(named_refs(data.issue_labels))
    }
}
