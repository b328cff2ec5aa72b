use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleStatus {
    Current,
    Past,
    Future,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedIssue {
    pub id: String,
    pub identifier: String,
    pub title: String,
    pub priority: u8,
    pub priority_label: String,
    pub status: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_status: Option<CycleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub labels: Vec<String>,
}

/// The single ordered result of one request, as handed to the display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub issues: Vec<ClassifiedIssue>,
    pub total_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_cycle: Option<u32>,
    pub updated_at: String,
    pub user_name: String,
}
