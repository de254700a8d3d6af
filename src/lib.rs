//! Prompt Compare library
//!
//! Version comparison, diff rendering and the admin panel interaction model,
//! shared by the desktop viewer and the integration tests.

pub mod admin_dashboard;
pub mod app;
pub mod avatar;
pub mod backend;
pub mod comments;
pub mod compare;
pub mod config;
pub mod constant;
pub mod diff;
pub mod messages;
pub mod modal;
pub mod notification;
pub mod render;
pub mod style;
pub mod table;
pub mod ui;
pub mod version;
