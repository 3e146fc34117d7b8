//! In-memory trackers for exercising a sync run without the network.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::dates::SyncWindow;
use crate::error::ApiError;
use crate::models::{
    Issue, IssueWorklog, JiraUser, StatusResult, TimeEntry, TogglUser, WorklogAuthor,
};
use crate::tracker::{IssueTracker, TimeTracker};

pub const JIRA_USER: &str = "jdoe";

#[derive(Default)]
pub struct FakeJira {
    worklogs: RefCell<Vec<(String, IssueWorklog)>>,
    next_id: Cell<u64>,
    create_overrides: RefCell<HashMap<String, StatusResult>>,
    delete_overrides: RefCell<HashMap<String, StatusResult>>,
    fail_mutations: Cell<bool>,
    fail_reads: Cell<bool>,
    calls: RefCell<Vec<String>>,
}

impl FakeJira {
    pub fn with_worklog(self, issue_key: &str, id: &str, author: &str, started: &str, seconds: i64, comment: &str) -> Self {
        self.worklogs.borrow_mut().push((
            issue_key.to_string(),
            IssueWorklog {
                id: id.to_string(),
                author: WorklogAuthor {
                    name: author.to_string(),
                },
                started: started.to_string(),
                time_spent_seconds: seconds,
                comment: Some(comment.to_string()),
            },
        ));
        self
    }

    pub fn respond_to_create(&self, issue_key: &str, status: u16, body: &str) {
        self.create_overrides.borrow_mut().insert(
            issue_key.to_string(),
            StatusResult {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn respond_to_delete(&self, worklog_id: &str, status: u16, body: &str) {
        self.delete_overrides.borrow_mut().insert(
            worklog_id.to_string(),
            StatusResult {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn fail_mutations(&self) {
        self.fail_mutations.set(true);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.set(true);
    }

    /// Mutating calls in the order they were made.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn worklogs_on(&self, issue_key: &str) -> Vec<IssueWorklog> {
        self.worklogs
            .borrow()
            .iter()
            .filter(|(key, _)| key == issue_key)
            .map(|(_, worklog)| worklog.clone())
            .collect()
    }

    fn read_guard(&self) -> Result<(), ApiError> {
        if self.fail_reads.get() {
            return Err(ApiError::Server {
                service: "Jira",
                status: 503,
                body: "maintenance".to_string(),
            });
        }
        Ok(())
    }

    fn mutation_guard(&self) -> Result<(), ApiError> {
        if self.fail_mutations.get() {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        Ok(())
    }
}

impl IssueTracker for FakeJira {
    fn endpoint(&self) -> &str {
        "https://jira.test"
    }

    fn authenticate(&self) -> Result<JiraUser, ApiError> {
        self.read_guard()?;
        Ok(JiraUser {
            name: JIRA_USER.to_string(),
        })
    }

    fn search_issues(
        &self,
        _project_slug: &str,
        author: &JiraUser,
        _window: &SyncWindow,
    ) -> Result<Vec<Issue>, ApiError> {
        self.read_guard()?;
        let mut issues: Vec<Issue> = Vec::new();
        for (key, worklog) in self.worklogs.borrow().iter() {
            if worklog.author.name == author.name && !issues.iter().any(|issue| &issue.key == key) {
                issues.push(Issue { key: key.clone() });
            }
        }
        Ok(issues)
    }

    fn issue_worklogs(&self, issue_key: &str) -> Result<Vec<IssueWorklog>, ApiError> {
        self.read_guard()?;
        Ok(self.worklogs_on(issue_key))
    }

    fn create_worklog(
        &self,
        issue_key: &str,
        started: &str,
        time_spent_seconds: i64,
        comment: &str,
    ) -> Result<StatusResult, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("create {issue_key} {started} {time_spent_seconds}"));
        self.mutation_guard()?;
        if let Some(result) = self.create_overrides.borrow().get(issue_key) {
            return Ok(result.clone());
        }
        let id = self.next_id.get() + 1000;
        self.next_id.set(self.next_id.get() + 1);
        self.worklogs.borrow_mut().push((
            issue_key.to_string(),
            IssueWorklog {
                id: id.to_string(),
                author: WorklogAuthor {
                    name: JIRA_USER.to_string(),
                },
                started: started.to_string(),
                time_spent_seconds,
                comment: Some(comment.to_string()),
            },
        ));
        Ok(StatusResult {
            status: 201,
            body: format!(r#"{{"id":"{id}"}}"#),
        })
    }

    fn delete_worklog(&self, issue_key: &str, worklog_id: &str) -> Result<StatusResult, ApiError> {
        self.calls
            .borrow_mut()
            .push(format!("delete {issue_key} {worklog_id}"));
        self.mutation_guard()?;
        if let Some(result) = self.delete_overrides.borrow().get(worklog_id) {
            return Ok(result.clone());
        }
        self.worklogs
            .borrow_mut()
            .retain(|(key, worklog)| !(key == issue_key && worklog.id == worklog_id));
        Ok(StatusResult {
            status: 204,
            body: String::new(),
        })
    }
}

#[derive(Default)]
pub struct FakeToggl {
    entries: Vec<TimeEntry>,
    fail_reads: bool,
}

impl FakeToggl {
    pub fn with_entry(mut self, id: u64, description: &str, start: &str, duration: i64) -> Self {
        self.entries.push(TimeEntry {
            id,
            description: Some(description.to_string()),
            duration,
            start: start.to_string(),
        });
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_reads = true;
        self
    }
}

impl TimeTracker for FakeToggl {
    fn endpoint(&self) -> &str {
        "https://toggl.test"
    }

    fn authenticate(&self) -> Result<TogglUser, ApiError> {
        if self.fail_reads {
            return Err(ApiError::Unauthorized { service: "Toggl" });
        }
        Ok(TogglUser {
            email: "jdoe@example.com".to_string(),
        })
    }

    fn time_entries(&self, _window: &SyncWindow) -> Result<Vec<TimeEntry>, ApiError> {
        if self.fail_reads {
            return Err(ApiError::Unauthorized { service: "Toggl" });
        }
        Ok(self.entries.clone())
    }
}
