use std::collections::HashMap;

use crate::model::tracker::Cycle;

/// All cycles of one team, with the active one (if any) flagged.
#[derive(Debug, Clone)]
pub struct TeamCycles {
    pub team_id: String,
    pub cycles: Vec<Cycle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleInfo {
    pub number: u32,
    pub is_active: bool,
}

/// Per-request lookups from cycle id to its info and from team id to the
/// number of that team's active cycle.
#[derive(Debug, Default)]
pub struct CycleIndex {
    cycles: HashMap<String, CycleInfo>,
    team_active: HashMap<String, u32>,
    first_active: Option<u32>,
}

impl CycleIndex {
    pub fn build(teams: &[TeamCycles]) -> Self {
        let mut index = Self::default();
        for team in teams {
            for cycle in &team.cycles {
                index.cycles.insert(
                    cycle.id.clone(),
                    CycleInfo {
                        number: cycle.number,
                        is_active: cycle.is_active,
                    },
                );
            }
            // The tracker guarantees at most one active cycle; take the first if not.
            if let Some(active) = team.cycles.iter().find(|c| c.is_active) {
                index
                    .team_active
                    .entry(team.team_id.clone())
                    .or_insert(active.number);
                index.first_active.get_or_insert(active.number);
            }
        }
        index
    }

    pub fn cycle(&self, cycle_id: &str) -> Option<CycleInfo> {
        self.cycles.get(cycle_id).copied()
    }

    pub fn active_cycle_number(&self, team_id: &str) -> Option<u32> {
        self.team_active.get(team_id).copied()
    }

    /// Active cycle of the first team, in listing order, that has one.
    pub fn first_active_cycle(&self) -> Option<u32> {
        self.first_active
    }

    pub fn teams_with_active_cycle(&self) -> usize {
        self.team_active.len()
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }
}
