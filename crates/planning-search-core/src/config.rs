use anyhow::{Context, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::{ActiveFilter, Term};

/// Project-level settings supplied by the hosting session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_start_of_week")]
    pub start_of_week: Weekday,
    #[serde(default = "default_filter")]
    pub default_filter: ActiveFilter,
    #[serde(default)]
    pub options: SearchOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            time_format: default_time_format(),
            start_of_week: default_start_of_week(),
            default_filter: default_filter(),
            options: SearchOptions::default(),
        }
    }
}

/// Selectable vocabularies for the multi-select and single-select fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default)]
    pub categories: Vec<Term>,
    #[serde(default)]
    pub subjects: Vec<Term>,
    #[serde(default)]
    pub content_types: Vec<Term>,
    #[serde(default)]
    pub urgencies: Vec<Term>,
    #[serde(default)]
    pub ingest_providers: Vec<Term>,
    #[serde(default = "default_workflow_states")]
    pub workflow_states: Vec<Term>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            subjects: Vec::new(),
            content_types: Vec::new(),
            urgencies: Vec::new(),
            ingest_providers: Vec::new(),
            workflow_states: default_workflow_states(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: SearchConfig,
    pub user: UserConfig,
}

pub fn load_project_config(project_root: &Path) -> Result<SearchConfig> {
    let path = project_root.join(".psearch/config.toml");
    if !path.exists() {
        return Ok(SearchConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<SearchConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("psearch/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(project_root: &Path) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    tracing::debug!(
        default_filter = %project.default_filter,
        start_of_week = %project.start_of_week,
        "resolved search config"
    );
    Ok(EffectiveConfig { project, user })
}

fn default_date_format() -> String {
    "DD/MM/YYYY".to_string()
}

fn default_time_format() -> String {
    "HH:mm".to_string()
}

const fn default_start_of_week() -> Weekday {
    Weekday::Sun
}

const fn default_filter() -> ActiveFilter {
    ActiveFilter::Combined
}

fn default_workflow_states() -> Vec<Term> {
    [
        ("draft", "Draft"),
        ("ingested", "Ingested"),
        ("scheduled", "Scheduled"),
        ("killed", "Killed"),
        ("cancelled", "Cancelled"),
        ("rescheduled", "Rescheduled"),
        ("postponed", "Postponed"),
    ]
    .into_iter()
    .map(|(qcode, name)| Term::new(qcode, name))
    .collect()
}
