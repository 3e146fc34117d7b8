use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::dates::{format_date, SyncWindow};
use crate::error::ApiError;
use crate::http::{self, network};
use crate::models::{Issue, IssueSearch, IssueWorklog, IssueWorklogs, JiraUser, NewWorklog, StatusResult};
use crate::tracker::IssueTracker;

const SERVICE: &str = "Jira";

#[derive(Clone)]
pub struct JiraClient {
    client: Client,
    base_url: String,
    endpoint: String,
    access_token: String,
}

impl JiraClient {
    pub fn new(endpoint: &str, access_token: String) -> Self {
        let endpoint = endpoint.trim_end_matches('/').to_string();
        Self {
            client: http::build_client(),
            base_url: format!("{endpoint}/rest/api/2"),
            endpoint,
            access_token,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
    }

    fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.authorized(self.client.get(url)).send().map_err(network)?;
        http::parse_json(SERVICE, response)
    }

    fn worklog_url(&self, issue_key: &str) -> String {
        format!("{}/issue/{}/worklog", self.base_url, issue_key)
    }
}

pub fn worklog_search_jql(project_slug: &str, author: &str, window: &SyncWindow) -> String {
    format!(
        r#"project = {} AND worklogDate >= "{}" AND worklogDate < "{}" AND worklogAuthor = "{}""#,
        project_slug,
        format_date(window.from_date()),
        format_date(window.to_date()),
        author
    )
}

impl IssueTracker for JiraClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn authenticate(&self) -> Result<JiraUser, ApiError> {
        self.fetch(&format!("{}/myself", self.base_url))
    }

    fn search_issues(
        &self,
        project_slug: &str,
        author: &JiraUser,
        window: &SyncWindow,
    ) -> Result<Vec<Issue>, ApiError> {
        let jql = worklog_search_jql(project_slug, &author.name, window);
        let url = reqwest::Url::parse_with_params(&format!("{}/search", self.base_url), &[("jql", jql)])
            .map_err(|err| ApiError::Network(err.to_string()))?;
        let search: IssueSearch = self.fetch(url.as_str())?;
        Ok(search.issues)
    }

    fn issue_worklogs(&self, issue_key: &str) -> Result<Vec<IssueWorklog>, ApiError> {
        let worklogs: IssueWorklogs = self.fetch(&self.worklog_url(issue_key))?;
        Ok(worklogs.worklogs)
    }

    fn create_worklog(
        &self,
        issue_key: &str,
        started: &str,
        time_spent_seconds: i64,
        comment: &str,
    ) -> Result<StatusResult, ApiError> {
        let payload = NewWorklog {
            comment,
            time_spent_seconds,
            started,
        };
        let body = serde_json::to_string(&payload).map_err(|err| ApiError::Decode(err.to_string()))?;
        let response = self
            .authorized(self.client.post(self.worklog_url(issue_key)))
            .body(body)
            .send()
            .map_err(network)?;
        Ok(http::into_status(response))
    }

    fn delete_worklog(&self, issue_key: &str, worklog_id: &str) -> Result<StatusResult, ApiError> {
        let url = format!("{}/{}", self.worklog_url(issue_key), worklog_id);
        let response = self
            .authorized(self.client.delete(url))
            .send()
            .map_err(network)?;
        Ok(http::into_status(response))
    }
}
