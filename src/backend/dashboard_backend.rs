//! Dashboard card lists: recent projects, prompts and teams.

use super::remote_backend::{RemoteClient, RemoteError};
use crate::constant::{DASHBOARD_PROJECT_LIMIT, DASHBOARD_PROMPT_LIMIT, DASHBOARD_TEAM_LIMIT};
use chrono::{DateTime, Utc};
use maud::{Markup, html};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

const NO_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectCard {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptCard {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub project_id: Option<Value>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub version: Option<Value>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TeamCard {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// What a dashboard section shows once its fetch settles
#[derive(Debug, Clone, PartialEq)]
pub enum CardList<T> {
    Items(Vec<T>),
    Empty,
    Failed(String),
}

impl<T> CardList<T> {
    /// Keep the first `limit` items; nothing left means the empty state
    pub fn from_items(mut items: Vec<T>, limit: usize) -> Self {
        if items.is_empty() {
            return CardList::Empty;
        }
        items.truncate(limit);
        CardList::Items(items)
    }
}

/// "Jan 5, 2024"
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Coarse "3 days ago" style text relative to `now`
pub fn format_relative_time(date: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - *date).num_seconds();
    let (past, seconds) = if seconds >= 0 {
        (true, seconds)
    } else {
        (false, -seconds)
    };

    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3600.0).round() as i64;
    let days = (seconds as f64 / 86_400.0).round() as i64;

    let phrase = if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{minutes} minutes")
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{hours} hours")
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{days} days")
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        match (days as f64 / 30.4).round() as i64 {
            1 => "a month".to_string(),
            months => format!("{months} months"),
        }
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days as f64 / 365.25).round() as i64)
    };

    if past {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn description_or_default(description: &Option<String>) -> &str {
    description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
}

impl ProjectCard {
    pub fn href(&self) -> String {
        format!("/projects/{}", id_text(&self.id))
    }

    pub fn to_html(&self, now: DateTime<Utc>) -> Markup {
        let updated = self.updated_at.unwrap_or(self.created_at);
        let (lock, visibility) = if self.is_public {
            ("unlock", "Public")
        } else {
            ("lock", "Private")
        };
        html! {
            div class="item-card" data-href=(self.href()) {
                h3 class="item-title" { (self.name) }
                div class="item-meta" {
                    span { i class="bi bi-calendar3" {} " " (format_date(&self.created_at)) }
                    span { i class="bi bi-clock" {} " " (format_relative_time(&updated, now)) }
                    span { i class={ "bi bi-" (lock) "-fill" } {} " " (visibility) }
                }
                p class="item-description" { (description_or_default(&self.description)) }
            }
        }
    }
}

impl PromptCard {
    pub fn href(&self) -> String {
        let project = self.project_id.as_ref().map(id_text).unwrap_or_default();
        format!("/projects/{}/prompts/{}", project, id_text(&self.id))
    }

    pub fn to_html(&self, now: DateTime<Utc>) -> Markup {
        let version = self
            .version
            .as_ref()
            .map(id_text)
            .unwrap_or_else(|| "1".to_string());
        let last_used = self
            .last_used
            .map(|d| format_relative_time(&d, now))
            .unwrap_or_else(|| "Never used".to_string());
        html! {
            div class="item-card" data-href=(self.href()) {
                h3 class="item-title" { (self.name) }
                div class="item-meta" {
                    span { i class="bi bi-folder" {} " " (self.project_name.as_deref().unwrap_or("Unknown Project")) }
                    span { i class="bi bi-tag" {} " " (version) }
                    span { i class="bi bi-clock" {} " " (last_used) }
                }
                p class="item-description" { (description_or_default(&self.description)) }
            }
        }
    }
}

impl TeamCard {
    pub fn href(&self) -> String {
        format!("/teams/id/{}", id_text(&self.id))
    }

    pub fn role_icon(&self) -> &'static str {
        match self.role.as_deref() {
            Some("Owner") => "bi-person-fill-gear",
            Some("Admin") => "bi-person-fill-lock",
            _ => "bi-person",
        }
    }

    pub fn to_html(&self, now: DateTime<Utc>) -> Markup {
        let created = self
            .created_at
            .map(|d| format_relative_time(&d, now))
            .unwrap_or_else(|| "recently".to_string());
        html! {
            div class="item-card" data-href=(self.href()) {
                h3 class="item-title" { (self.name) }
                div class="item-meta" {
                    span { i class={ "bi " (self.role_icon()) } {} " " (self.role.as_deref().unwrap_or("Member")) }
                    span { i class="bi bi-people" {} " " (self.member_count.unwrap_or(1)) " members" }
                    span { i class="bi bi-calendar3" {} " Created " (created) }
                }
                p class="item-description" { (description_or_default(&self.description)) }
            }
        }
    }
}

/// `items` is plural ("projects"); the button drops the trailing letter
pub fn empty_state_html(items: &str, create_link: &str, icon: &str) -> Markup {
    let singular = items.strip_suffix('s').unwrap_or(items);
    html! {
        div class="empty-state" {
            p { i class={ "bi " (icon) " me-2" } {} "You don't have any " (items) " yet." }
            a href=(create_link) class="btn btn-primary" { "Create " (singular) }
        }
    }
}

pub fn error_state_html(message: &str) -> Markup {
    html! {
        div class="empty-state" {
            p { i class="bi bi-exclamation-triangle text-warning me-2" {} (message) }
            button class="btn btn-primary" data-action="reload" { "Refresh" }
        }
    }
}

pub fn section_html<T>(
    list: &CardList<T>,
    items: &str,
    create_link: &str,
    icon: &str,
    card: impl Fn(&T) -> Markup,
) -> Markup {
    match list {
        CardList::Items(cards) => html! { @for c in cards { (card(c)) } },
        CardList::Empty => empty_state_html(items, create_link, icon),
        CardList::Failed(message) => error_state_html(message),
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, RemoteError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
}

pub struct DashboardBackend {
    client: RemoteClient,
}

impl DashboardBackend {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    pub fn projects(&self) -> CardList<ProjectCard> {
        match self.client.get("/api/projects").and_then(decode) {
            Ok(projects) => CardList::from_items(projects, DASHBOARD_PROJECT_LIMIT),
            Err(err) => {
                tracing::error!("Error fetching projects: {}", err);
                CardList::Failed(err.to_string())
            }
        }
    }

    /// Recent prompts, or the first project's prompts when that endpoint is missing
    pub fn recent_prompts(&self) -> CardList<PromptCard> {
        let prompts = match self.client.get("/api/prompts/recent") {
            Ok(value) => decode(value),
            Err(RemoteError::Api { status, .. }) => {
                tracing::warn!(
                    "Recent prompts endpoint not available ({}). Using fallback.",
                    status
                );
                Ok(self.prompts_fallback())
            }
            Err(err) => Err(err),
        };

        match prompts {
            Ok(prompts) => CardList::from_items(prompts, DASHBOARD_PROMPT_LIMIT),
            Err(err) => {
                tracing::error!("Error fetching prompts: {}", err);
                CardList::Failed(err.to_string())
            }
        }
    }

    /// Never fails; any error along the way yields no prompts
    fn prompts_fallback(&self) -> Vec<PromptCard> {
        let result = (|| -> Result<Vec<PromptCard>, RemoteError> {
            let projects: Vec<ProjectCard> = decode(self.client.get("/api/projects")?)?;
            let Some(project) = projects.first() else {
                return Ok(Vec::new());
            };

            let mut prompts: Vec<PromptCard> = decode(
                self.client
                    .get(&format!("/api/projects/{}/prompts", id_text(&project.id)))?,
            )?;
            for prompt in &mut prompts {
                prompt.project_id = Some(project.id.clone());
                prompt.project_name = Some(project.name.clone());
            }
            // newest first; undated prompts sink to the end
            prompts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(prompts)
        })();

        result.unwrap_or_else(|err| {
            tracing::error!("Error in fallback fetching prompts: {}", err);
            Vec::new()
        })
    }

    /// All teams, or only the caller's teams when the full list is refused
    pub fn teams(&self) -> CardList<TeamCard> {
        let teams = match self.client.get("/api/teams") {
            Ok(value) => decode(value),
            Err(RemoteError::Api { status, .. }) => {
                tracing::warn!("Teams endpoint not available ({}). Using fallback.", status);
                Ok(self
                    .client
                    .get("/api/teams?my_teams_only=true")
                    .and_then(decode)
                    .unwrap_or_else(|err| {
                        tracing::error!("Error in teams fallback: {}", err);
                        Vec::new()
                    }))
            }
            Err(err) => Err(err),
        };

        match teams {
            Ok(teams) => CardList::from_items(teams, DASHBOARD_TEAM_LIMIT),
            Err(err) => {
                tracing::error!("Error fetching teams: {}", err);
                CardList::Failed(err.to_string())
            }
        }
    }
}
