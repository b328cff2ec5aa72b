/// The authenticated user the snapshot is built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: String,
}

/// A team-scoped iteration. `number` only increases within its own team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub id: String,
    pub number: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    /// 0 = none, 1 = urgent, 2 = high, 3 = normal, 4 = low
    pub priority: u8,
    pub priority_label: String,
    pub url: String,
    pub due_date: Option<String>,
    pub team_id: String,
    /// None for backlog items.
    pub cycle_id: Option<String>,
    pub state: Option<IssueRef>,
    /// Tracker order.
    pub labels: Vec<IssueRef>,
}

/// A state or label as attached to an issue. The name is carried inline when
/// the tracker returns it and otherwise resolved through the id lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    pub id: String,
    pub name: Option<String>,
}

/// Id/name pair returned by the workflow state and label lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}
