use crate::diff::SyncPlan;
use crate::error::ApiError;
use crate::models::StatusResult;
use crate::tracker::IssueTracker;
use crate::worklog::Worklog;

const CREATED: u16 = 201;
const NO_CONTENT: u16 = 204;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Delete,
    Create,
}

impl OperationKind {
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Delete => "delete",
            OperationKind::Create => "create",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OperationFailure {
    pub kind: OperationKind,
    pub worklog: Worklog,
    pub reason: String,
}

/// Outcome of applying a [`SyncPlan`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    pub total: usize,
    pub successful: usize,
    pub failures: Vec<OperationFailure>,
}

impl ExecutionReport {
    pub fn is_success(&self) -> bool {
        self.successful == self.total
    }
}

/// Deletes first, then creates. A failed operation is logged and recorded,
/// never propagated.
pub fn execute(tracker: &dyn IssueTracker, plan: &SyncPlan) -> ExecutionReport {
    let mut report = ExecutionReport {
        total: plan.operation_count(),
        ..ExecutionReport::default()
    };

    for worklog in &plan.to_delete {
        log::info!("delete jira worklog {}", worklog.summary());
        let outcome = delete(tracker, worklog);
        record(&mut report, OperationKind::Delete, worklog, outcome);
    }

    for worklog in &plan.to_add {
        log::info!("add new jira worklog {}", worklog.summary());
        let outcome = create(tracker, worklog);
        record(&mut report, OperationKind::Create, worklog, outcome);
    }

    report
}

fn delete(tracker: &dyn IssueTracker, worklog: &Worklog) -> Result<(), String> {
    let (Some(issue_key), Some(id)) = (worklog.issue_key.as_deref(), worklog.id.as_deref()) else {
        return Err("worklog has no issue key or id".to_string());
    };
    expect_status(tracker.delete_worklog(issue_key, id), NO_CONTENT)
}

fn create(tracker: &dyn IssueTracker, worklog: &Worklog) -> Result<(), String> {
    let Some(issue_key) = worklog.issue_key.as_deref() else {
        return Err("worklog has no issue key".to_string());
    };
    let started = worklog.started_string();
    let result = tracker.create_worklog(
        issue_key,
        &started,
        worklog.time_spent_seconds,
        &worklog.comment,
    );
    expect_status(result, CREATED)
}

fn expect_status(result: Result<StatusResult, ApiError>, expected: u16) -> Result<(), String> {
    match result {
        Ok(outcome) if outcome.status == expected => Ok(()),
        Ok(outcome) => Err(format!("{} {}", outcome.status, outcome.body)),
        Err(err) => Err(err.to_string()),
    }
}

fn record(
    report: &mut ExecutionReport,
    kind: OperationKind,
    worklog: &Worklog,
    outcome: Result<(), String>,
) {
    match outcome {
        Ok(()) => report.successful += 1,
        Err(reason) => {
            log::error!("failed to {} worklog ({reason})", kind.label());
            report.failures.push(OperationFailure {
                kind,
                worklog: worklog.clone(),
                reason,
            });
        }
    }
}
