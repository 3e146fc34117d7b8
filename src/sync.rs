use crate::config::Config;
use crate::dates::SyncWindow;
use crate::diff::{self, SyncPlan};
use crate::error::SyncError;
use crate::executor::{self, ExecutionReport};
use crate::filter::{is_syncable_entry, MarkerFilter};
use crate::normalize::{issue_worklog_to_worklog, DescriptionParser};
use crate::tracker::{IssueTracker, TimeTracker};
use crate::worklog::Worklog;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub plan: SyncPlan,
    /// `None` when the run was a dry run.
    pub report: Option<ExecutionReport>,
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        self.report.as_ref().is_none_or(ExecutionReport::is_success)
    }
}

/// One full pass: read both sides, diff, then apply the diff to Jira.
///
/// Any failure while reading aborts before Jira is modified.
pub fn run(
    config: &Config,
    jira: &dyn IssueTracker,
    toggl: &dyn TimeTracker,
    window: &SyncWindow,
    options: SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    log::info!(
        "starting sync with window of {} days ({}) searching for {}",
        config.sync_window_size,
        window.label(),
        config.jira_project_slug
    );

    let mirror = fetch_mirror_worklogs(config, jira, window)?;
    let source = fetch_source_worklogs(config, toggl, window)?;

    let plan = diff::plan(&source, &mirror);
    log::info!(
        "{}/{} toggl worklogs are already in sync",
        plan.matched,
        source.len()
    );
    log::info!(
        "{} jira worklogs to add, {} jira worklogs to delete",
        plan.to_add.len(),
        plan.to_delete.len()
    );

    if plan.is_empty() {
        log::info!("nothing to change on jira");
    }

    if options.dry_run {
        for worklog in &plan.to_delete {
            log::info!("dry run: would delete jira worklog {}", worklog.summary());
        }
        for worklog in &plan.to_add {
            log::info!("dry run: would add jira worklog {}", worklog.summary());
        }
        return Ok(SyncOutcome { plan, report: None });
    }

    let report = executor::execute(jira, &plan);
    Ok(SyncOutcome {
        plan,
        report: Some(report),
    })
}

/// Jira worklogs by the authenticated user, inside the window, created by this tool.
pub fn fetch_mirror_worklogs(
    config: &Config,
    jira: &dyn IssueTracker,
    window: &SyncWindow,
) -> Result<Vec<Worklog>, SyncError> {
    log::info!("connecting to jira ({})", jira.endpoint());
    let user = jira
        .authenticate()
        .map_err(SyncError::fetch("authenticate with jira"))?;
    log::info!("authenticated as {}", user.name);

    let issues = jira
        .search_issues(&config.jira_project_slug, &user, window)
        .map_err(SyncError::fetch("search jira issues"))?;
    log::info!("found {} issues with relevant worklogs", issues.len());

    let mut worklogs = Vec::new();
    for issue in &issues {
        let raw = jira
            .issue_worklogs(&issue.key)
            .map_err(SyncError::fetch("fetch jira worklogs"))?;
        for entry in raw.iter().filter(|entry| entry.author.name == user.name) {
            let worklog = issue_worklog_to_worklog(&issue.key, entry)?;
            if window.contains(&worklog.started) {
                worklogs.push(worklog);
            }
        }
    }

    let filter = MarkerFilter::new();
    let total = worklogs.len();
    let synced: Vec<Worklog> = worklogs
        .into_iter()
        .filter(|worklog| filter.is_synced_worklog(worklog))
        .collect();
    log::info!("found {total} worklogs, {} of which will be synced", synced.len());
    for worklog in &synced {
        log::debug!("jira worklog {}", worklog.summary());
    }
    Ok(synced)
}

/// Toggl time entries reduced to syncable worklogs.
pub fn fetch_source_worklogs(
    config: &Config,
    toggl: &dyn TimeTracker,
    window: &SyncWindow,
) -> Result<Vec<Worklog>, SyncError> {
    log::info!("connecting to toggl ({})", toggl.endpoint());
    let user = toggl
        .authenticate()
        .map_err(SyncError::fetch("authenticate with toggl"))?;
    log::info!("authenticated as {}", user.email);

    let entries = toggl
        .time_entries(window)
        .map_err(SyncError::fetch("fetch toggl time entries"))?;

    let parser = DescriptionParser::new(&config.jira_project_slug);
    let mut syncable = Vec::new();
    for entry in &entries {
        let worklog = parser.time_entry_to_worklog(entry)?;
        if is_syncable_entry(&worklog) {
            syncable.push(worklog);
        }
    }
    log::info!(
        "found {} time entries, {} of which will be synced",
        entries.len(),
        syncable.len()
    );
    for worklog in &syncable {
        log::debug!("toggl worklog {}", worklog.summary());
    }
    Ok(syncable)
}
