//! Admin dashboard: chart configurations, time range selector and the
//! refresh button.
//!
//! Charts are described as Chart.js style `{type, data, options}` documents.
//! Drawing them is the chart library's job.

use crate::backend::remote_backend::ActionButton;
use crate::constant::{DASHBOARD_RANGE_RELOAD_MS, DASHBOARD_REFRESH_MS};
use crate::notification::Notifications;
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

pub const PRIMARY_COLOR: &str = "#1a3a6e";
pub const INFO_COLOR: &str = "#17a2b8";
pub const SUCCESS_COLOR: &str = "#28a745";
pub const WARNING_COLOR: &str = "#fd7e14";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Unknown time range: {0}")]
    UnknownTimeRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Doughnut,
    Bar,
}

/// One color for the whole series, or one per data point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Fill {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub background_color: Fill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    /// Secondary axis id for series plotted against their own scale
    #[serde(rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

impl Dataset {
    /// Filled, smoothed line with a translucent area under it
    fn line(label: &str, color: &str, data: Vec<u32>) -> Self {
        Self {
            label: Some(label.to_string()),
            data,
            border_color: Some(color.to_string()),
            background_color: Fill::Single(translucent(color, 0.1)),
            tension: Some(0.4),
            fill: true,
            border_width: None,
            y_axis_id: None,
        }
    }

    fn bar(label: &str, color: &str, data: Vec<u32>) -> Self {
        Self {
            label: Some(label.to_string()),
            data,
            border_color: None,
            background_color: Fill::Single(color.to_string()),
            tension: None,
            fill: false,
            border_width: None,
            y_axis_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    /// Canvas the chart is mounted on; a missing canvas skips the chart
    #[serde(skip)]
    pub canvas_id: &'static str,
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: Value,
}

impl ChartConfig {
    pub fn series_labels(&self) -> Vec<&str> {
        self.data
            .datasets
            .iter()
            .filter_map(|d| d.label.as_deref())
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// `#1a3a6e` at `alpha` as a CSS `rgba()`; anything that is not `#rrggbb` is returned as is
pub fn translucent(hex: &str, alpha: f32) -> String {
    let channels = hex
        .strip_prefix('#')
        .filter(|h| h.len() == 6)
        .and_then(|h| {
            let channel = |i: usize| u8::from_str_radix(h.get(i..i + 2)?, 16).ok();
            Some((channel(0)?, channel(2)?, channel(4)?))
        });
    match channels {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {alpha})"),
        None => hex.to_string(),
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn user_activity_chart() -> ChartConfig {
    ChartConfig {
        canvas_id: "userActivityChart",
        kind: ChartKind::Line,
        data: ChartData {
            labels: labels(&[
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
            ]),
            datasets: vec![
                Dataset::line("Logins", PRIMARY_COLOR, vec![65, 59, 80, 81, 56, 55, 40]),
                Dataset::line("Projects", INFO_COLOR, vec![28, 48, 40, 19, 86, 27, 90]),
                Dataset::line("Prompts", SUCCESS_COLOR, vec![12, 19, 3, 5, 2, 3, 20]),
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {
                "legend": {"position": "top"},
                "tooltip": {"mode": "index", "intersect": false}
            },
            "scales": {
                "y": {"beginAtZero": true, "grid": {"drawBorder": false}},
                "x": {"grid": {"display": false}}
            }
        }),
    }
}

pub fn content_distribution_chart() -> ChartConfig {
    ChartConfig {
        canvas_id: "contentDistributionChart",
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: labels(&["Projects", "Prompts", "Teams", "Users"]),
            datasets: vec![Dataset {
                label: None,
                data: vec![25, 45, 15, 15],
                border_color: None,
                background_color: Fill::PerPoint(labels(&[
                    PRIMARY_COLOR,
                    INFO_COLOR,
                    SUCCESS_COLOR,
                    WARNING_COLOR,
                ])),
                tension: None,
                fill: false,
                border_width: Some(0),
                y_axis_id: None,
            }],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {"legend": {"position": "bottom"}},
            "cutout": "70%"
        }),
    }
}

pub fn system_performance_chart() -> ChartConfig {
    let response_time = Dataset {
        y_axis_id: Some("y1".to_string()),
        ..Dataset::bar(
            "Response Time (ms)",
            SUCCESS_COLOR,
            vec![150, 90, 220, 380, 250, 150],
        )
    };
    ChartConfig {
        canvas_id: "systemPerformanceChart",
        kind: ChartKind::Bar,
        data: ChartData {
            labels: labels(&["12am", "4am", "8am", "12pm", "4pm", "8pm"]),
            datasets: vec![
                Dataset::bar(
                    "API Calls",
                    PRIMARY_COLOR,
                    vec![1200, 590, 2500, 3800, 2900, 1500],
                ),
                response_time,
            ],
        },
        options: json!({
            "responsive": true,
            "maintainAspectRatio": false,
            "plugins": {"legend": {"position": "top"}},
            "scales": {
                "y": {"beginAtZero": true, "title": {"display": true, "text": "API Calls"}},
                "y1": {
                    "beginAtZero": true,
                    "position": "right",
                    "grid": {"drawOnChartArea": false},
                    "title": {"display": true, "text": "Response Time (ms)"}
                },
                "x": {"grid": {"display": false}}
            }
        }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    Today,
    #[default]
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Today,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Quarter,
        TimeRange::Year,
    ];

    /// Option value in the selector
    pub fn value(self) -> &'static str {
        match self {
            TimeRange::Today => "today",
            TimeRange::Week => "7days",
            TimeRange::Month => "30days",
            TimeRange::Quarter => "90days",
            TimeRange::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Today => "Today",
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
            TimeRange::Quarter => "Last 90 days",
            TimeRange::Year => "This year",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeRange {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|range| range.value() == s)
            .ok_or_else(|| DashboardError::UnknownTimeRange(s.to_string()))
    }
}

/// Charts plus the two controls that reload them
#[derive(Debug)]
pub struct AdminDashboard {
    charts: Vec<ChartConfig>,
    time_range: TimeRange,
    refresh: ActionButton,
    refresh_due: Option<Instant>,
    range_due: Option<Instant>,
}

impl Default for AdminDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl AdminDashboard {
    pub fn new() -> Self {
        Self {
            charts: vec![
                user_activity_chart(),
                content_distribution_chart(),
                system_performance_chart(),
            ],
            time_range: TimeRange::default(),
            refresh: ActionButton::new("Refresh", "Refreshing..."),
            refresh_due: None,
            range_due: None,
        }
    }

    /// Charts whose canvas exists on the page
    pub fn mounted_charts(&self, has_canvas: impl Fn(&str) -> bool) -> Vec<&ChartConfig> {
        self.charts
            .iter()
            .filter(|chart| has_canvas(chart.canvas_id))
            .collect()
    }

    pub fn charts(&self) -> &[ChartConfig] {
        &self.charts
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn refresh_button(&self) -> &ActionButton {
        &self.refresh
    }

    /// Card bodies show their loading overlay while a range change is applied
    pub fn is_loading(&self) -> bool {
        self.range_due.is_some()
    }

    /// Returns false while a refresh is already running
    pub fn refresh(&mut self, now: Instant) -> bool {
        if !self.refresh.begin() {
            return false;
        }
        debug!("Refreshing dashboard");
        self.refresh_due = Some(now + Duration::from_millis(DASHBOARD_REFRESH_MS));
        true
    }

    /// A later change restarts the wait, so only the last range is announced
    pub fn set_time_range(&mut self, range: TimeRange, now: Instant) {
        info!("Time range changed to: {}", range.value());
        self.time_range = range;
        self.range_due = Some(now + Duration::from_millis(DASHBOARD_RANGE_RELOAD_MS));
    }

    /// Finish whatever is due and announce it
    pub fn tick(&mut self, now: Instant, notifications: &mut Notifications) {
        if self.refresh_due.is_some_and(|due| now >= due) {
            self.refresh_due = None;
            self.refresh.finish();
            notifications.success("Dashboard refreshed successfully!", now);
        }
        if self.range_due.is_some_and(|due| now >= due) {
            self.range_due = None;
            notifications.info(format!("Dashboard updated for {}", self.time_range), now);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        [self.refresh_due, self.range_due].into_iter().flatten().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::ToastKind;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn activity_chart_matches_chart_js_shape() {
        let chart: Value = serde_json::from_str(&user_activity_chart().to_json().unwrap()).unwrap();
        assert_eq!(chart["type"], "line");
        assert_eq!(chart["data"]["labels"][0], "Monday");
        let logins = &chart["data"]["datasets"][0];
        assert_eq!(logins["label"], "Logins");
        assert_eq!(logins["borderColor"], "#1a3a6e");
        assert_eq!(logins["backgroundColor"], "rgba(26, 58, 110, 0.1)");
        assert_eq!(logins["fill"], true);
        assert_eq!(logins["data"].as_array().unwrap().len(), 7);
        assert!(chart.get("canvas_id").is_none());
    }

    #[test]
    fn performance_chart_puts_response_time_on_second_axis() {
        let chart = system_performance_chart();
        assert_eq!(chart.series_labels(), vec!["API Calls", "Response Time (ms)"]);

        let json: Value = serde_json::from_str(&chart.to_json().unwrap()).unwrap();
        assert!(json["data"]["datasets"][0].get("yAxisID").is_none());
        assert_eq!(json["data"]["datasets"][1]["yAxisID"], "y1");
        assert_eq!(json["options"]["scales"]["y1"]["position"], "right");
        assert!(json["data"]["datasets"][0].get("fill").is_none());
    }

    #[test]
    fn distribution_chart_colors_each_slice() {
        let json: Value =
            serde_json::from_str(&content_distribution_chart().to_json().unwrap()).unwrap();
        let dataset = &json["data"]["datasets"][0];
        assert_eq!(dataset["backgroundColor"].as_array().unwrap().len(), 4);
        assert_eq!(dataset["backgroundColor"][3], WARNING_COLOR);
        assert_eq!(dataset["borderWidth"], 0);
        assert!(dataset.get("label").is_none());
    }

    #[test]
    fn translucent_accepts_only_six_digit_hex() {
        assert_eq!(translucent("#28a745", 0.1), "rgba(40, 167, 69, 0.1)");
        assert_eq!(translucent("teal", 0.5), "teal");
        assert_eq!(translucent("#fff", 0.5), "#fff");
    }

    #[test]
    fn charts_without_canvas_are_skipped() {
        let dashboard = AdminDashboard::new();
        let mounted = dashboard.mounted_charts(|id| id != "contentDistributionChart");
        let ids: Vec<&str> = mounted.iter().map(|c| c.canvas_id).collect();
        assert_eq!(ids, vec!["userActivityChart", "systemPerformanceChart"]);
    }

    #[test]
    fn refresh_is_busy_until_done() {
        let start = Instant::now();
        let mut dashboard = AdminDashboard::new();
        let mut notifications = Notifications::new(ms(5000));

        assert!(dashboard.refresh(start));
        assert_eq!(dashboard.refresh_button().label(), "Refreshing...");
        assert!(dashboard.refresh_button().is_disabled());
        assert!(!dashboard.refresh(start + ms(10)));

        dashboard.tick(start + ms(1499), &mut notifications);
        assert!(notifications.is_empty());

        dashboard.tick(start + ms(1500), &mut notifications);
        assert_eq!(dashboard.refresh_button().label(), "Refresh");
        let toast = &notifications.toasts()[0];
        assert_eq!(toast.kind, ToastKind::Success);
        assert_eq!(toast.message, "Dashboard refreshed successfully!");
        assert_eq!(dashboard.next_deadline(), None);
    }

    #[test]
    fn latest_time_range_is_announced_once() {
        let start = Instant::now();
        let mut dashboard = AdminDashboard::new();
        let mut notifications = Notifications::new(ms(5000));

        dashboard.set_time_range(TimeRange::Month, start);
        dashboard.set_time_range(TimeRange::Year, start + ms(500));
        assert!(dashboard.is_loading());
        assert_eq!(dashboard.next_deadline(), Some(start + ms(1500)));

        dashboard.tick(start + ms(1000), &mut notifications);
        assert!(notifications.is_empty());

        dashboard.tick(start + ms(1500), &mut notifications);
        assert!(!dashboard.is_loading());
        assert_eq!(notifications.toasts().len(), 1);
        assert_eq!(notifications.toasts()[0].kind, ToastKind::Info);
        assert_eq!(
            notifications.toasts()[0].message,
            "Dashboard updated for This year"
        );
    }

    #[test]
    fn time_range_parses_selector_values() {
        assert_eq!("30days".parse::<TimeRange>(), Ok(TimeRange::Month));
        assert_eq!(TimeRange::default().value(), "7days");
        assert_eq!(
            "decade".parse::<TimeRange>(),
            Err(DashboardError::UnknownTimeRange("decade".to_string()))
        );
    }
}
