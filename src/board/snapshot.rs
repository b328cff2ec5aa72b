use chrono::{DateTime, SecondsFormat, Utc};

use crate::model::board::{ClassifiedIssue, Snapshot};

/// Wraps an already ordered issue list into the snapshot the display reads.
pub fn assemble(
    issues: Vec<ClassifiedIssue>,
    current_cycle: Option<u32>,
    user_name: &str,
    now: DateTime<Utc>,
) -> Snapshot {
    Snapshot {
        total_count: issues.len(),
        issues,
        current_cycle,
        updated_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        user_name: user_name.to_string(),
    }
}
