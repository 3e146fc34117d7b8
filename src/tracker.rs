use crate::dates::SyncWindow;
use crate::error::ApiError;
use crate::models::{Issue, IssueWorklog, JiraUser, StatusResult, TimeEntry, TogglUser};

/// The Jira operations a sync run needs.
pub trait IssueTracker {
    fn endpoint(&self) -> &str;

    fn authenticate(&self) -> Result<JiraUser, ApiError>;

    /// Issues in `project_slug` carrying worklogs by `author` inside `window`.
    fn search_issues(
        &self,
        project_slug: &str,
        author: &JiraUser,
        window: &SyncWindow,
    ) -> Result<Vec<Issue>, ApiError>;

    fn issue_worklogs(&self, issue_key: &str) -> Result<Vec<IssueWorklog>, ApiError>;

    fn create_worklog(
        &self,
        issue_key: &str,
        started: &str,
        time_spent_seconds: i64,
        comment: &str,
    ) -> Result<StatusResult, ApiError>;

    fn delete_worklog(&self, issue_key: &str, worklog_id: &str) -> Result<StatusResult, ApiError>;
}

/// The Toggl operations a sync run needs. Toggl is only ever read.
pub trait TimeTracker {
    fn endpoint(&self) -> &str;

    fn authenticate(&self) -> Result<TogglUser, ApiError>;

    fn time_entries(&self, window: &SyncWindow) -> Result<Vec<TimeEntry>, ApiError>;
}
