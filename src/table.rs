//! Client-side view over the users table.
//!
//! Rows are never removed; the view only decides which are visible and in
//! what order.

use crate::avatar::AvatarElement;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Unknown status filter: {0}")]
    UnknownFilter(String),

    #[error("Unknown sort order: {0}")]
    UnknownSort(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

fn default_status() -> String {
    "active".to_string()
}

impl UserRow {
    pub fn is_invited(&self) -> bool {
        self.status == "invited"
    }

    /// Text the search box matches against: the user-info cell
    fn search_text(&self) -> String {
        format!("{} {}", self.username, self.email).to_lowercase()
    }

    pub fn avatar(&self) -> AvatarElement {
        let mut avatar = AvatarElement::new("");
        avatar.style_for_user(&self.username, Some(self.id));
        avatar
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Admin,
    /// Neither admin nor still invited
    Regular,
    Invited,
}

impl StatusFilter {
    pub fn matches(self, row: &UserRow) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Admin => row.is_admin,
            StatusFilter::Regular => !row.is_admin && !row.is_invited(),
            StatusFilter::Invited => row.is_invited(),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(StatusFilter::All),
            "admin" => Ok(StatusFilter::Admin),
            "regular" => Ok(StatusFilter::Regular),
            "invited" => Ok(StatusFilter::Invited),
            other => Err(TableError::UnknownFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    AtoZ,
    ZtoA,
}

impl SortOrder {
    fn compare(self, a: &UserRow, b: &UserRow) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::AtoZ => compare_names(&a.username, &b.username),
            SortOrder::ZtoA => compare_names(&b.username, &a.username),
        }
    }
}

impl FromStr for SortOrder {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "a-z" => Ok(SortOrder::AtoZ),
            "z-a" => Ok(SortOrder::ZtoA),
            other => Err(TableError::UnknownSort(other.to_string())),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Default)]
pub struct UserTable {
    rows: Vec<UserRow>,
    search: String,
    filter: StatusFilter,
    sort: Option<SortOrder>,
}

impl UserTable {
    /// Rows keep their server order until a sort is chosen
    pub fn new(rows: Vec<UserRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_lowercase();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = Some(sort);
        // stable, so ties keep their previous relative order
        self.rows.sort_by(|a, b| sort.compare(a, b));
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    pub fn sort(&self) -> Option<SortOrder> {
        self.sort
    }

    pub fn is_visible(&self, row: &UserRow) -> bool {
        self.filter.matches(row) && row.search_text().contains(&self.search)
    }

    pub fn visible(&self) -> impl Iterator<Item = &UserRow> {
        self.rows.iter().filter(|row| self.is_visible(row))
    }

    pub fn visible_count(&self) -> usize {
        self.visible().count()
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn caption(&self) -> String {
        format!("Showing {} of {} users", self.visible_count(), self.total())
    }

    pub fn row(&self, id: i64) -> Option<&UserRow> {
        self.rows.iter().find(|row| row.id == id)
    }
}
