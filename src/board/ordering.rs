use crate::model::board::ClassifiedIssue;

fn sort_key(issue: &ClassifiedIssue) -> (u32, u8) {
    let cycle = issue.cycle_number.unwrap_or(u32::MAX);
    let priority = match issue.priority {
        0 => u8::MAX,
        p => p,
    };
    (cycle, priority)
}

/// Earlier cycles first, then urgent before low, with "no priority" last.
/// Equal keys keep their input order.
pub fn sort_issues(issues: &mut [ClassifiedIssue]) {
    issues.sort_by_key(sort_key);
}
