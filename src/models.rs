use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimeEntry {
    pub id: u64,
    pub description: Option<String>,
    /// Negative while the timer is still running.
    pub duration: i64,
    pub start: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TogglUser {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JiraUser {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Issue {
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueSearch {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorklogAuthor {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueWorklog {
    pub id: String,
    pub author: WorklogAuthor,
    pub started: String,
    pub time_spent_seconds: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssueWorklogs {
    #[serde(default)]
    pub worklogs: Vec<IssueWorklog>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorklog<'a> {
    pub comment: &'a str,
    pub time_spent_seconds: i64,
    pub started: &'a str,
}

/// Raw outcome of a mutating call, judged by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResult {
    pub status: u16,
    pub body: String,
}
