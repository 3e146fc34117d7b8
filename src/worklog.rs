use chrono::{DateTime, FixedOffset};

pub const MARKER_OPEN: &str = "[toggl-track-sync]";
pub const MARKER_CLOSE: &str = "[/toggl-track-sync]";

/// Layout Jira uses for `started`, e.g. `2024-01-05T09:00:00.000+0000`.
pub const JIRA_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// The shape both sides are reduced to before they are compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worklog {
    pub issue_key: Option<String>,
    pub started: DateTime<FixedOffset>,
    pub time_spent_seconds: i64,
    pub comment: String,
    /// Jira worklog id; only set for worklogs read back from Jira.
    pub id: Option<String>,
}

impl Worklog {
    pub fn whole_minutes(&self) -> i64 {
        self.time_spent_seconds.div_euclid(60)
    }

    pub fn started_string(&self) -> String {
        self.started.format(JIRA_TIMESTAMP_FORMAT).to_string()
    }

    /// Same issue, same start instant, same whole minutes.
    pub fn is_equivalent(&self, other: &Worklog) -> bool {
        self.issue_key == other.issue_key
            && self.started == other.started
            && self.whole_minutes() == other.whole_minutes()
    }

    /// `[PROJ-12 2024-01-05T09:00:00.000+0000 +60s]`
    pub fn summary(&self) -> String {
        format!(
            "[{} {} +{}s]",
            self.issue_key.as_deref().unwrap_or("-"),
            self.started_string(),
            self.time_spent_seconds
        )
    }
}

pub fn sync_marker(time_entry_id: u64) -> String {
    format!("{MARKER_OPEN}te-id={time_entry_id}{MARKER_CLOSE}")
}

pub fn parse_jira_timestamp(value: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_str(value, JIRA_TIMESTAMP_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
}

#[cfg(test)]
pub(crate) fn sample(issue_key: &str, started: &str, seconds: i64) -> Worklog {
    Worklog {
        issue_key: Some(issue_key.to_string()),
        started: parse_jira_timestamp(started).unwrap(),
        time_spent_seconds: seconds,
        comment: format!("work\n\n{}", sync_marker(1)),
        id: None,
    }
}
