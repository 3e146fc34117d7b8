use chrono::{NaiveDateTime, SubsecRound};
use regex::Regex;

use crate::error::MalformedRecord;
use crate::models::{IssueWorklog, TimeEntry};
use crate::worklog::{parse_jira_timestamp, sync_marker, Worklog};

/// Issue key and free text split out of a `PROJ-12/comment` description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescription {
    pub issue_key: String,
    pub comment: String,
}

#[derive(Debug, Clone)]
pub struct DescriptionParser {
    pattern: Regex,
}

impl DescriptionParser {
    pub fn new(project_slug: &str) -> Self {
        let pattern = format!(r"^(?P<key>{}-\d+)/(?P<comment>.*)$", regex::escape(project_slug));
        let pattern = Regex::new(&pattern).expect("escaped slug always forms a valid pattern");
        Self { pattern }
    }

    pub fn parse(&self, description: &str) -> Option<ParsedDescription> {
        let description = description.strip_suffix('\n').unwrap_or(description);
        let captures = self.pattern.captures(description)?;
        Some(ParsedDescription {
            issue_key: captures["key"].to_string(),
            comment: captures["comment"].to_string(),
        })
    }

    pub fn time_entry_to_worklog(&self, entry: &TimeEntry) -> Result<Worklog, MalformedRecord> {
        let description = entry.description.as_deref().unwrap_or_default();
        let (issue_key, comment) = match self.parse(description) {
            Some(parsed) => (
                Some(parsed.issue_key),
                format!("{}\n\n{}", parsed.comment, sync_marker(entry.id)),
            ),
            None => (None, description.to_string()),
        };

        let started = start_as_utc(&entry.start).map_err(|err| MalformedRecord {
            kind: "time entry",
            id: entry.id.to_string(),
            message: format!("start {:?}: {err}", entry.start),
        })?;

        Ok(Worklog {
            issue_key,
            started: started.trunc_subsecs(3).and_utc().fixed_offset(),
            time_spent_seconds: truncate_to_minutes(entry.duration),
            comment,
            id: None,
        })
    }
}

pub fn issue_worklog_to_worklog(
    issue_key: &str,
    worklog: &IssueWorklog,
) -> Result<Worklog, MalformedRecord> {
    let started = parse_jira_timestamp(&worklog.started).map_err(|err| MalformedRecord {
        kind: "worklog",
        id: worklog.id.clone(),
        message: format!("started {:?}: {err}", worklog.started),
    })?;
    Ok(Worklog {
        issue_key: Some(issue_key.to_string()),
        started,
        time_spent_seconds: worklog.time_spent_seconds,
        comment: worklog.comment.clone().unwrap_or_default(),
        id: Some(worklog.id.clone()),
    })
}

pub fn truncate_to_minutes(duration: i64) -> i64 {
    duration - duration.rem_euclid(60)
}

// The offset is dropped, not applied: Toggl start times are taken to be UTC already.
fn start_as_utc(start: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let (date, time) = start.split_once('T').unwrap_or((start, ""));
    let time = time.split(['+', '-']).next().unwrap_or(time);
    let time = time.strip_suffix('Z').unwrap_or(time);
    NaiveDateTime::parse_from_str(&format!("{date}T{time}"), "%Y-%m-%dT%H:%M:%S%.f")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorklogAuthor;

    fn entry(id: u64, description: Option<&str>, start: &str, duration: i64) -> TimeEntry {
        TimeEntry {
            id,
            description: description.map(str::to_string),
            duration,
            start: start.to_string(),
        }
    }

    #[test]
    fn parses_key_and_comment() {
        let parser = DescriptionParser::new("PROJ");
        let parsed = parser.parse("PROJ-12/fix bug").unwrap();
        assert_eq!(parsed.issue_key, "PROJ-12");
        assert_eq!(parsed.comment, "fix bug");
    }

    #[test]
    fn rejects_other_projects_and_shapes() {
        let parser = DescriptionParser::new("PROJ");
        assert!(parser.parse("OTHER-12/fix bug").is_none());
        assert!(parser.parse("PROJ-12 fix bug").is_none());
        assert!(parser.parse("PROJ-/fix bug").is_none());
        assert!(parser.parse("see PROJ-12/fix bug").is_none());
        assert!(parser.parse("").is_none());
    }

    #[test]
    fn slug_is_matched_literally() {
        let parser = DescriptionParser::new("A.B");
        assert!(parser.parse("A.B-1/x").is_some());
        assert!(parser.parse("AXB-1/x").is_none());
    }

    #[test]
    fn empty_comment_is_allowed() {
        let parser = DescriptionParser::new("PROJ");
        let parsed = parser.parse("PROJ-3/").unwrap();
        assert_eq!(parsed.comment, "");
    }

    #[test]
    fn converts_matching_entry() {
        let parser = DescriptionParser::new("PROJ");
        let worklog = parser
            .time_entry_to_worklog(&entry(7, Some("PROJ-12/fix bug"), "2024-01-05T09:00:00+02:00", 125))
            .unwrap();
        assert_eq!(worklog.issue_key.as_deref(), Some("PROJ-12"));
        assert_eq!(worklog.started_string(), "2024-01-05T09:00:00.000+0000");
        assert_eq!(worklog.time_spent_seconds, 120);
        assert_eq!(
            worklog.comment,
            "fix bug\n\n[toggl-track-sync]te-id=7[/toggl-track-sync]"
        );
        assert!(worklog.id.is_none());
    }

    #[test]
    fn non_matching_entry_keeps_description() {
        let parser = DescriptionParser::new("PROJ");
        let worklog = parser
            .time_entry_to_worklog(&entry(8, Some("lunch"), "2024-01-05T12:00:00+00:00", 1800))
            .unwrap();
        assert!(worklog.issue_key.is_none());
        assert_eq!(worklog.comment, "lunch");
    }

    #[test]
    fn missing_description_is_unkeyed() {
        let parser = DescriptionParser::new("PROJ");
        let worklog = parser
            .time_entry_to_worklog(&entry(9, None, "2024-01-05T12:00:00+00:00", 600))
            .unwrap();
        assert!(worklog.issue_key.is_none());
        assert_eq!(worklog.comment, "");
    }

    #[test]
    fn zulu_and_fractional_starts_normalize() {
        let parser = DescriptionParser::new("PROJ");
        let zulu = parser
            .time_entry_to_worklog(&entry(1, Some("PROJ-1/a"), "2024-01-05T09:00:00Z", 60))
            .unwrap();
        let fractional = parser
            .time_entry_to_worklog(&entry(2, Some("PROJ-1/a"), "2024-01-05T09:00:00.250+00:00", 60))
            .unwrap();
        assert_eq!(zulu.started_string(), "2024-01-05T09:00:00.000+0000");
        assert_eq!(fractional.started_string(), "2024-01-05T09:00:00.250+0000");
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let parser = DescriptionParser::new("PROJ");
        let worklog = parser
            .time_entry_to_worklog(&entry(4, Some("PROJ-1/a"), "2024-01-05T12:00:00.123456+00:00", 600))
            .unwrap();
        assert_eq!(worklog.started_string(), "2024-01-05T12:00:00.123+0000");
        let round_trip = parse_jira_timestamp(&worklog.started_string()).unwrap();
        assert_eq!(worklog.started, round_trip);
    }

    #[test]
    fn negative_offset_is_dropped_like_positive() {
        let parser = DescriptionParser::new("PROJ");
        let worklog = parser
            .time_entry_to_worklog(&entry(5, Some("PROJ-1/a"), "2024-01-05T09:00:00-05:00", 60))
            .unwrap();
        assert_eq!(worklog.started_string(), "2024-01-05T09:00:00.000+0000");
    }

    #[test]
    fn single_trailing_newline_is_ignored() {
        let parser = DescriptionParser::new("PROJ");
        let parsed = parser.parse("PROJ-1/x\n").unwrap();
        assert_eq!(parsed.issue_key, "PROJ-1");
        assert_eq!(parsed.comment, "x");
        assert!(parser.parse("PROJ-1/x\ny").is_none());
    }

    #[test]
    fn unparseable_start_is_malformed() {
        let parser = DescriptionParser::new("PROJ");
        let err = parser
            .time_entry_to_worklog(&entry(3, Some("PROJ-1/a"), "not a date", 60))
            .unwrap_err();
        assert_eq!(err.id, "3");
    }

    #[test]
    fn truncates_durations_to_whole_minutes() {
        assert_eq!(truncate_to_minutes(125), 120);
        assert_eq!(truncate_to_minutes(59), 0);
        assert_eq!(truncate_to_minutes(60), 60);
        assert_eq!(truncate_to_minutes(3599), 3540);
        assert_eq!(truncate_to_minutes(-1_704_445_200 - 30), -1_704_445_260);
    }

    #[test]
    fn converts_issue_worklog() {
        let raw = IssueWorklog {
            id: "10042".to_string(),
            author: WorklogAuthor {
                name: "jdoe".to_string(),
            },
            started: "2024-01-05T10:00:00.000+0100".to_string(),
            time_spent_seconds: 90,
            comment: None,
        };
        let worklog = issue_worklog_to_worklog("PROJ-12", &raw).unwrap();
        assert_eq!(worklog.issue_key.as_deref(), Some("PROJ-12"));
        assert_eq!(worklog.id.as_deref(), Some("10042"));
        assert_eq!(worklog.time_spent_seconds, 90);
        assert_eq!(worklog.comment, "");
        assert_eq!(worklog.started.timestamp(), 1_704_445_200);
    }
}
