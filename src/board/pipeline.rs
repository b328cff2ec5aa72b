use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use tracing::{debug, info};

use super::classify::{classify, Lookups};
use super::cycle_index::{CycleIndex, TeamCycles};
use super::ordering::sort_issues;
use super::snapshot::assemble;
use crate::model::board::{ClassifiedIssue, Snapshot};
use crate::model::tracker::Team;
use crate::tracker::Tracker;

async fn fetch_team_cycles(tracker: &dyn Tracker, team: &Team) -> Result<TeamCycles> {
    let (mut all, active) = tokio::try_join!(
        tracker.cycles(&team.id, false),
        tracker.cycles(&team.id, true),
    )
    .with_context(|| format!("Failed to fetch cycles for team {}", team.id))?;

    for cycle in &mut all {
        cycle.is_active = active.iter().any(|a| a.id == cycle.id);
    }
    // An active cycle may fall outside the single page of all cycles.
    for cycle in active {
        if !all.iter().any(|c| c.id == cycle.id) {
            all.push(cycle);
        }
    }

    Ok(TeamCycles {
        team_id: team.id.clone(),
        cycles: all,
    })
}

/// Runs one full request: fetch, index, classify, order, assemble.
/// Any upstream error aborts the whole snapshot.
pub async fn build_snapshot(tracker: &dyn Tracker, now: DateTime<Utc>) -> Result<Snapshot> {
    let viewer = tracker.viewer().await.context("Failed to fetch viewer")?;
    let teams = tracker.teams().await.context("Failed to fetch teams")?;

    let (team_cycles, issues, states, labels) = tokio::try_join!(
        try_join_all(teams.iter().map(|team| fetch_team_cycles(tracker, team))),
        async {
            tracker
                .assigned_issues(&viewer.id)
                .await
                .context("Failed to fetch assigned issues")
        },
        async {
            tracker
                .workflow_states()
                .await
                .context("Failed to fetch workflow states")
        },
        async { tracker.labels().await.context("Failed to fetch labels") },
    )?;

    let index = CycleIndex::build(&team_cycles);
    let lookups = Lookups::new(states, labels);
    debug!(
        teams = teams.len(),
        cycles = index.len(),
        active_teams = index.teams_with_active_cycle(),
        "built cycle index"
    );

    let fetched = issues.len();
    let mut classified: Vec<ClassifiedIssue> = issues
        .iter()
        .filter_map(|issue| classify(issue, &index, &lookups))
        .collect();
    sort_issues(&mut classified);

    info!(
        fetched,
        included = classified.len(),
        current_cycle = ?index.first_active_cycle(),
        "assembled snapshot"
    );

    Ok(assemble(
        classified,
        index.first_active_cycle(),
        &viewer.name,
        now,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::board::CycleStatus;
    use crate::tracker::fixture::{cycle, issue, issue_ref, FixtureTracker};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn active_and_past_cycles_ordered_backlog_dropped() {
        let tracker = FixtureTracker::new("Ada")
            .with_team("T", vec![cycle("C3", 3, false), cycle("C5", 5, true)])
            .with_issue(issue("X", "T", Some("C5"), 2))
            .with_issue(issue("Y", "T", Some("C3"), 1))
            .with_issue(issue("Z", "T", None, 1));

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        let ids: Vec<&str> = snapshot.issues.iter().map(|i| i.identifier.as_str()).collect();
        assert_eq!(ids, vec!["Y", "X"]);
        assert_eq!(snapshot.total_count, 2);
        assert_eq!(snapshot.current_cycle, Some(5));
        assert_eq!(snapshot.user_name, "Ada");
        assert_eq!(snapshot.issues[0].cycle_status, Some(CycleStatus::Past));
        assert_eq!(snapshot.issues[1].cycle_status, Some(CycleStatus::Current));
    }

    #[tokio::test]
    async fn no_active_cycle_anywhere_falls_back_to_current() {
        let tracker = FixtureTracker::new("Ada")
            .with_team("T", vec![cycle("C2", 2, false)])
            .with_issue(issue("X", "T", Some("C2"), 3));

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        assert_eq!(snapshot.current_cycle, None);
        assert_eq!(snapshot.issues[0].cycle_status, Some(CycleStatus::Current));
    }

    #[tokio::test]
    async fn zero_issues_still_reports_current_cycle() {
        let tracker = FixtureTracker::new("Ada")
            .with_team("T", vec![cycle("C5", 5, true)])
            .with_issue(issue("Z", "T", None, 1));

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        assert_eq!(snapshot.total_count, 0);
        assert!(snapshot.issues.is_empty());
        assert_eq!(snapshot.current_cycle, Some(5));
    }

    #[tokio::test]
    async fn multi_team_statuses_stay_team_relative() {
        let tracker = FixtureTracker::new("Ada")
            .with_team("ops", vec![cycle("o1", 1, false)])
            .with_team("eng", vec![cycle("e4", 4, true), cycle("e6", 6, false)])
            .with_team("web", vec![cycle("w7", 7, true), cycle("w9", 9, false)])
            .with_issue(issue("W", "web", Some("w7"), 1))
            .with_issue(issue("E", "eng", Some("e6"), 1))
            .with_issue(issue("O", "ops", Some("o1"), 0));

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        let statuses: Vec<(&str, Option<CycleStatus>)> = snapshot
            .issues
            .iter()
            .map(|i| (i.identifier.as_str(), i.cycle_status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                ("O", Some(CycleStatus::Current)),
                ("E", Some(CycleStatus::Future)),
                ("W", Some(CycleStatus::Current)),
            ]
        );
        // First team in listing order with an active cycle.
        assert_eq!(snapshot.current_cycle, Some(4));
    }

    #[tokio::test]
    async fn upstream_failure_aborts_without_partial_snapshot() {
        let tracker = FixtureTracker::new("Ada")
            .with_team("T", vec![cycle("C5", 5, true)])
            .with_issue(issue("X", "T", Some("C5"), 2))
            .failing_on("cycles");

        let err = build_snapshot(&tracker, now()).await.unwrap_err();
        assert!(format!("{err:#}").contains("fixture failure in cycles"));
        assert!(err.to_string().contains("team T"));
    }

    #[tokio::test]
    async fn resolves_states_and_labels() {
        let mut raw = issue("X", "T", Some("C5"), 2);
        raw.state = Some(issue_ref("s-progress", None));
        raw.labels = vec![issue_ref("l-ui", None), issue_ref("l-bug", Some("Bug"))];
        let tracker = FixtureTracker::new("Ada")
            .with_team("T", vec![cycle("C5", 5, true)])
            .with_state("s-progress", "In Progress")
            .with_label("l-ui", "UI")
            .with_issue(raw);

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        assert_eq!(snapshot.issues[0].status, "In Progress");
        assert_eq!(snapshot.issues[0].labels, vec!["UI", "Bug"]);
    }

    #[tokio::test]
    async fn active_cycle_beyond_cycle_page_is_still_indexed() {
        let tracker = FixtureTracker::new("Ada")
            .with_team_active_outside_page(
                "T",
                vec![cycle("C1", 1, false), cycle("C2", 2, false)],
                cycle("C60", 60, true),
            )
            .with_issue(issue("NOW", "T", Some("C60"), 2))
            .with_issue(issue("OLD", "T", Some("C2"), 1));

        let snapshot = build_snapshot(&tracker, now()).await.unwrap();

        assert_eq!(snapshot.total_count, 2);
        assert_eq!(snapshot.current_cycle, Some(60));
        assert_eq!(snapshot.issues[0].identifier, "OLD");
        assert_eq!(snapshot.issues[0].cycle_status, Some(CycleStatus::Past));
        assert_eq!(snapshot.issues[1].identifier, "NOW");
        assert_eq!(snapshot.issues[1].cycle_number, Some(60));
        assert_eq!(snapshot.issues[1].cycle_status, Some(CycleStatus::Current));
    }
}
