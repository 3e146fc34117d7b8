use regex::Regex;

use crate::worklog::Worklog;

/// Toggl side: needs an issue key and at least one whole minute.
pub fn is_syncable_entry(worklog: &Worklog) -> bool {
    worklog.issue_key.is_some() && worklog.whole_minutes() > 0
}

/// Jira side: only worklogs this tool created carry the marker.
#[derive(Debug, Clone)]
pub struct MarkerFilter {
    pattern: Regex,
}

impl MarkerFilter {
    pub fn new() -> Self {
        let pattern = Regex::new(r"(?s)^.*\[toggl-track-sync\][a-z0-9=-]+\[/toggl-track-sync\].*$")
            .expect("marker pattern is valid");
        Self { pattern }
    }

    pub fn is_synced_worklog(&self, worklog: &Worklog) -> bool {
        self.pattern.is_match(&worklog.comment)
    }
}
