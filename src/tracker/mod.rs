pub mod linear;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::tracker::{Cycle, Issue, NamedRef, Team, Viewer};

/// Read-only view of the issue tracker, scoped to one credential.
#[async_trait]
pub trait Tracker: Send + Sync {
    async fn viewer(&self) -> Result<Viewer>;
    async fn teams(&self) -> Result<Vec<Team>>;
    /// Cycles of one team. With `active_only` the tracker filters server-side
    /// and every returned cycle is active.
    async fn cycles(&self, team_id: &str, active_only: bool) -> Result<Vec<Cycle>>;
    /// Issues assigned to `viewer_id` whose state is neither completed nor canceled.
    async fn assigned_issues(&self, viewer_id: &str) -> Result<Vec<Issue>>;
    async fn workflow_states(&self) -> Result<Vec<NamedRef>>;
    async fn labels(&self) -> Result<Vec<NamedRef>>;
}

/// Builds a tracker for the credential resolved from a request.
pub trait TrackerFactory: Send + Sync {
    fn connect(&self, api_key: &str) -> Arc<dyn Tracker>;
}

#[cfg(test)]
pub mod fixture;
