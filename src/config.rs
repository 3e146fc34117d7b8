use std::collections::HashMap;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const DEFAULT_TOGGL_URL: &str = "https://api.track.toggl.com";
pub const DEFAULT_WINDOW_SIZE: u32 = 1;

const KEYS: [&str; 6] = [
    "JIRA_URL",
    "JIRA_ACCESS_TOKEN",
    "JIRA_PROJECT_SLUG",
    "TOGGL_URL",
    "TOGGL_API_KEY",
    "SYNC_WINDOW_SIZE",
];
const HOME_ENV_FILE: &str = ".toggl-track-sync.env";

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub jira_endpoint: String,
    pub jira_access_token: String,
    pub jira_project_slug: String,
    pub toggl_endpoint: String,
    pub toggl_api_key: String,
    pub sync_window_size: u32,
}

impl Config {
    /// Reads the dotenv file (if any) and overlays the process environment.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_values = match resolve_env_file(env_file, Path::new("."), dirs::home_dir()) {
            Some(path) => read_env_file(&path)?,
            None => HashMap::new(),
        };
        let values = merge(file_values, env_values(env::vars_os())?);
        Self::from_values(&values)
    }

    pub fn from_values(values: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let jira_endpoint = required_url(values, "JIRA_URL", None)?;
        let jira_access_token = required(values, "JIRA_ACCESS_TOKEN", None)?;
        let jira_project_slug = required(values, "JIRA_PROJECT_SLUG", None)?;
        let toggl_endpoint = required_url(values, "TOGGL_URL", Some(DEFAULT_TOGGL_URL))?;
        let toggl_api_key = required(values, "TOGGL_API_KEY", None)?;
        let sync_window_size = match lookup(values, "SYNC_WINDOW_SIZE") {
            Some(raw) => parse_window_size(raw)?,
            None => DEFAULT_WINDOW_SIZE,
        };

        Ok(Self {
            jira_endpoint,
            jira_access_token,
            jira_project_slug,
            toggl_endpoint,
            toggl_api_key,
            sync_window_size,
        })
    }
}

pub fn parse_window_size(raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
        key: "SYNC_WINDOW_SIZE",
        reason: format!("{raw:?} is not a whole number of days, at least 0"),
    })
}

fn lookup<'a>(values: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    values
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn required(
    values: &HashMap<String, String>,
    key: &'static str,
    default: Option<&str>,
) -> Result<String, ConfigError> {
    lookup(values, key)
        .or(default)
        .map(str::to_string)
        .ok_or(ConfigError::Missing(key))
}

fn required_url(
    values: &HashMap<String, String>,
    key: &'static str,
    default: Option<&str>,
) -> Result<String, ConfigError> {
    let value = required(values, key, default)?;
    let url = reqwest::Url::parse(&value).map_err(|err| ConfigError::Invalid {
        key,
        reason: err.to_string(),
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let to_error = |err: dotenvy::Error| ConfigError::EnvFile {
        path: path.display().to_string(),
        message: err.to_string(),
    };
    let mut values = HashMap::new();
    for item in dotenvy::from_path_iter(path).map_err(to_error)? {
        let (key, value) = item.map_err(to_error)?;
        values.insert(key, value);
    }
    Ok(values)
}

/// An explicit file always wins; otherwise `.env` in `dir`, then the dotfile in `home`.
fn resolve_env_file(explicit: Option<&Path>, dir: &Path, home: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = dir.join(".env");
    if local.is_file() {
        return Some(local);
    }
    let path = home?.join(HOME_ENV_FILE);
    path.is_file().then_some(path)
}

/// Non-UTF-8 variables are skipped unless they are one of ours.
fn env_values(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> Result<Vec<(String, String)>, ConfigError> {
    let mut values = Vec::new();
    for (key, value) in vars {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => values.push((key, value)),
            (Ok(key), Err(_)) => {
                if let Some(known) = KEYS.iter().find(|known| **known == key) {
                    return Err(ConfigError::Invalid {
                        key: *known,
                        reason: "not valid UTF-8".to_string(),
                    });
                }
            }
            (Err(_), _) => {}
        }
    }
    Ok(values)
}

/// Environment overrides the file, except that a blank variable does not mask a file value.
fn merge(
    mut file_values: HashMap<String, String>,
    env_values: impl IntoIterator<Item = (String, String)>,
) -> HashMap<String, String> {
    for (key, value) in env_values {
        if value.trim().is_empty() && file_values.contains_key(&key) {
            continue;
        }
        file_values.insert(key, value);
    }
    file_values
}
