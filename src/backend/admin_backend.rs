//! Admin panel actions: invitations, admin rights, teams.
//!
//! Each gesture builds one [`AdminAction`] holding everything the request
//! and its messages need, so nothing is read back from shared state once the
//! request is in flight.

use super::remote_backend::{ActionButton, Method, RemoteClient, RemoteError};
use crate::constant::{RELOAD_DELAY_MS, ROW_FADE_MS, TEAM_RELOAD_DELAY_MS};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::LazyLock;
use std::time::Duration;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteRequest {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub expiry_hours: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_message: Option<String>,
}

impl InviteRequest {
    /// Trims the inputs; an empty personal message is omitted from the body
    pub fn new(
        username: &str,
        email: &str,
        is_admin: bool,
        expiry_hours: u32,
        personal_message: &str,
    ) -> Self {
        let personal_message = personal_message.trim();
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            is_admin,
            expiry_hours,
            personal_message: (!personal_message.is_empty()).then(|| personal_message.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    Invite(InviteRequest),
    ResendInvite {
        user_id: i64,
        email: String,
        expiry_hours: u32,
    },
    SetAdmin {
        user_id: i64,
        username: String,
        grant: bool,
    },
    CreateTeam {
        name: String,
        description: String,
    },
    DeleteTeam {
        team_id: String,
        team_name: String,
    },
}

/// What the page does after a successful action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    Reload { after: Duration },
    RemoveRow { id: String, fade: Duration },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub message: String,
    pub follow_up: FollowUp,
}

impl AdminAction {
    pub fn create_team(name: &str, description: &str) -> Self {
        AdminAction::CreateTeam {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    /// Local checks run before any request is sent
    pub fn validate(&self) -> Result<(), RemoteError> {
        match self {
            AdminAction::Invite(invite) => {
                if invite.username.is_empty() || invite.email.is_empty() {
                    return Err(RemoteError::Validation(
                        "Please fill in all required fields".to_string(),
                    ));
                }
                if !is_valid_email(&invite.email) {
                    return Err(RemoteError::Validation(
                        "Please enter a valid email address".to_string(),
                    ));
                }
                Ok(())
            }
            AdminAction::CreateTeam { name, .. } if name.is_empty() => Err(
                RemoteError::Validation("Please enter a team name".to_string()),
            ),
            _ => Ok(()),
        }
    }

    pub fn request(&self) -> (Method, String, Option<Value>) {
        match self {
            AdminAction::Invite(invite) => (
                Method::Post,
                "/api/admin/users/invite".to_string(),
                serde_json::to_value(invite).ok(),
            ),
            AdminAction::ResendInvite {
                user_id,
                expiry_hours,
                ..
            } => (
                Method::Post,
                format!("/api/admin/users/{user_id}/resend-invite"),
                Some(json!({ "expiry_hours": expiry_hours })),
            ),
            AdminAction::SetAdmin { user_id, grant, .. } => (
                Method::Post,
                format!("/api/admin/users/{user_id}/admin"),
                Some(json!({ "is_admin_status": grant })),
            ),
            AdminAction::CreateTeam { name, description } => (
                Method::Post,
                "/api/admin/teams".to_string(),
                Some(json!({ "name": name, "description": description })),
            ),
            AdminAction::DeleteTeam { team_id, .. } => (
                Method::Delete,
                format!("/api/admin/teams/{team_id}"),
                None,
            ),
        }
    }

    /// Idle and busy labels of the button that confirms this action
    pub fn button(&self) -> ActionButton {
        match self {
            AdminAction::Invite(_) => ActionButton::new("Send Invitation", "Sending..."),
            AdminAction::ResendInvite { .. } => {
                ActionButton::new("Resend Invitation", "Sending...")
            }
            AdminAction::SetAdmin { grant: true, .. } => {
                ActionButton::new("Grant Admin Rights", "Processing...")
            }
            AdminAction::SetAdmin { grant: false, .. } => {
                ActionButton::new("Revoke Admin Rights", "Processing...")
            }
            AdminAction::CreateTeam { .. } => ActionButton::new("Create Team", "Creating..."),
            AdminAction::DeleteTeam { .. } => ActionButton::new("Delete", "Deleting..."),
        }
    }

    pub fn outcome(&self, response: &Value) -> ActionOutcome {
        let server_message = response
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let reload = FollowUp::Reload {
            after: Duration::from_millis(RELOAD_DELAY_MS),
        };

        match self {
            AdminAction::Invite(invite) => ActionOutcome {
                message: format!("Invitation sent to {} successfully", invite.email),
                follow_up: reload,
            },
            AdminAction::ResendInvite { email, .. } => ActionOutcome {
                message: format!("Invitation resent to {email} successfully"),
                follow_up: reload,
            },
            AdminAction::SetAdmin { grant, .. } => ActionOutcome {
                message: format!(
                    "Admin privileges {} successfully",
                    if *grant { "granted" } else { "revoked" }
                ),
                follow_up: reload,
            },
            AdminAction::CreateTeam { name, .. } => ActionOutcome {
                message: server_message
                    .unwrap_or_else(|| format!("Team {name} created successfully")),
                follow_up: FollowUp::Reload {
                    after: Duration::from_millis(TEAM_RELOAD_DELAY_MS),
                },
            },
            AdminAction::DeleteTeam { team_id, .. } => ActionOutcome {
                message: server_message.unwrap_or_else(|| "Team deleted successfully".to_string()),
                follow_up: FollowUp::RemoveRow {
                    id: team_id.clone(),
                    fade: Duration::from_millis(ROW_FADE_MS),
                },
            },
        }
    }

    /// Map a failure to the text shown in the error toast
    pub fn friendly_error(&self, err: &RemoteError) -> String {
        let raw = err.to_string();

        match self {
            AdminAction::Invite(invite) => {
                if raw.contains("Username already exists") {
                    format!(
                        "The username \"{}\" is already taken. Please choose a different username.",
                        invite.username
                    )
                } else if raw.contains("Email already exists") {
                    format!(
                        "The email \"{}\" is already registered in the system.",
                        invite.email
                    )
                } else {
                    raw
                }
            }
            AdminAction::ResendInvite { .. } => {
                if raw.contains("not in 'invited' status") {
                    "This user cannot be re-invited because they are no longer in the invited state."
                        .to_string()
                } else if raw.contains("not found") {
                    "The user no longer exists in the system.".to_string()
                } else {
                    raw
                }
            }
            AdminAction::SetAdmin { .. } => {
                if raw.contains("not found") {
                    "The user no longer exists in the system.".to_string()
                } else if raw.contains("permission") || raw.contains("authorized") {
                    "You don't have permission to change admin privileges.".to_string()
                } else {
                    raw
                }
            }
            AdminAction::CreateTeam { .. } if raw.is_empty() => "Failed to create team".to_string(),
            AdminAction::DeleteTeam { .. } if raw.is_empty() => "Failed to delete team".to_string(),
            _ => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamMember {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamProject {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamDetails {
    pub id: Value,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
    #[serde(default)]
    pub projects: Vec<TeamProject>,
}

pub struct AdminBackend {
    client: RemoteClient,
}

impl AdminBackend {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    /// Validate, send, and turn the answer into toast text either way
    pub fn perform(&self, action: &AdminAction) -> Result<ActionOutcome, String> {
        if let Err(err) = action.validate() {
            return Err(err.to_string());
        }

        let (method, path, body) = action.request();
        tracing::info!("Admin action {:?} {}", method, path);

        match self.client.request(method, &path, body.as_ref()) {
            Ok(response) => Ok(action.outcome(&response)),
            Err(err) => {
                tracing::warn!("Admin action {} failed: {}", path, err);
                Err(action.friendly_error(&err))
            }
        }
    }

    /// Runs the action behind its button: refuses a second submit while one
    /// is in flight, always restores the label afterwards
    pub fn perform_with(
        &self,
        action: &AdminAction,
        button: &mut ActionButton,
    ) -> Option<Result<ActionOutcome, String>> {
        if action.validate().is_ok() && !button.begin() {
            return None;
        }
        let result = self.perform(action);
        button.finish();
        Some(result)
    }

    /// Accepts either a bare team object or `{"team": {...}}`
    pub fn team_details(&self, team_id: &str) -> Result<TeamDetails, RemoteError> {
        let mut value = self.client.get(&format!("/api/admin/teams/{team_id}"))?;
        if let Some(team) = value.get_mut("team") {
            value = team.take();
        }
        serde_json::from_value(value).map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::remote_backend::RawResponse;
    use crate::backend::remote_backend::tests::MockTransport;

    fn invite(username: &str, email: &str) -> AdminAction {
        AdminAction::Invite(InviteRequest::new(username, email, false, 48, ""))
    }

    fn backend_with(responses: Vec<RawResponse>) -> (AdminBackend, std::sync::Arc<MockTransport>) {
        let transport = MockTransport::with(responses.into_iter().map(Ok).collect());
        (
            AdminBackend::new(RemoteClient::new(transport.clone())),
            transport,
        )
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("bob@example.com"));
        assert!(!is_valid_email("bob@example"));
        assert!(!is_valid_email("bob example@x.io"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn invalid_invite_sends_nothing() {
        let (backend, transport) = backend_with(vec![]);

        let err = backend.perform(&invite("  ", "bob@example.com")).unwrap_err();
        assert_eq!(err, "Please fill in all required fields");

        let err = backend.perform(&invite("bob", "not-an-email")).unwrap_err();
        assert_eq!(err, "Please enter a valid email address");

        assert!(transport.sent().is_empty());
    }

    #[test]
    fn invite_body_omits_empty_message() {
        let action = AdminAction::Invite(InviteRequest::new(" bob ", "bob@example.com", true, 24, "  "));
        let (method, path, body) = action.request();
        assert_eq!(method, Method::Post);
        assert_eq!(path, "/api/admin/users/invite");
        assert_eq!(
            body.unwrap(),
            json!({"username": "bob", "email": "bob@example.com", "is_admin": true, "expiry_hours": 24})
        );
    }

    #[test]
    fn invite_success_message_and_reload() {
        let (backend, _) = backend_with(vec![RawResponse::new(200, r#"{"id": 12}"#)]);
        let outcome = backend.perform(&invite("bob", "bob@example.com")).unwrap();
        assert_eq!(outcome.message, "Invitation sent to bob@example.com successfully");
        assert_eq!(
            outcome.follow_up,
            FollowUp::Reload {
                after: Duration::from_millis(1500)
            }
        );
    }

    #[test]
    fn duplicate_username_gets_friendly_copy() {
        let (backend, _) = backend_with(vec![RawResponse::new(
            409,
            r#"{"detail": {"error_type": "conflict", "detail": "Username already exists"}}"#,
        )]);
        let err = backend.perform(&invite("bob", "bob@example.com")).unwrap_err();
        assert_eq!(
            err,
            "The username \"bob\" is already taken. Please choose a different username."
        );
    }

    #[test]
    fn resend_errors_are_mapped() {
        let action = AdminAction::ResendInvite {
            user_id: 4,
            email: "bob@example.com".to_string(),
            expiry_hours: 48,
        };
        let api = |message: &str| RemoteError::Api {
            status: 400,
            message: message.to_string(),
        };
        assert_eq!(
            action.friendly_error(&api("User is not in 'invited' status")),
            "This user cannot be re-invited because they are no longer in the invited state."
        );
        assert_eq!(
            action.friendly_error(&api("User not found")),
            "The user no longer exists in the system."
        );
        assert_eq!(action.friendly_error(&api("Boom")), "Boom");
    }

    #[test]
    fn admin_toggle_sends_status_and_reports_direction() {
        let (backend, transport) = backend_with(vec![RawResponse::new(200, "{}")]);
        let action = AdminAction::SetAdmin {
            user_id: 9,
            username: "carol".to_string(),
            grant: false,
        };
        let outcome = backend.perform(&action).unwrap();
        assert_eq!(outcome.message, "Admin privileges revoked successfully");

        let sent = transport.sent();
        assert_eq!(sent[0].1, "/api/admin/users/9/admin");
        assert_eq!(sent[0].2, Some(json!({"is_admin_status": false})));

        let denied = RemoteError::Api {
            status: 403,
            message: "Not authorized".to_string(),
        };
        assert_eq!(
            action.friendly_error(&denied),
            "You don't have permission to change admin privileges."
        );
    }

    #[test]
    fn team_lifecycle_messages() {
        let (backend, transport) = backend_with(vec![
            RawResponse::new(201, r#"{"id": "t1"}"#),
            RawResponse::new(200, r#"{"message": "Team removed"}"#),
        ]);

        let created = backend.perform(&AdminAction::create_team(" Core ", "")).unwrap();
        assert_eq!(created.message, "Team Core created successfully");

        let deleted = backend
            .perform(&AdminAction::DeleteTeam {
                team_id: "t1".to_string(),
                team_name: "Core".to_string(),
            })
            .unwrap();
        assert_eq!(deleted.message, "Team removed");
        assert!(matches!(deleted.follow_up, FollowUp::RemoveRow { ref id, .. } if id == "t1"));

        assert_eq!(transport.sent()[1].0, Method::Delete);
        assert_eq!(
            backend.perform(&AdminAction::create_team("  ", "x")).unwrap_err(),
            "Please enter a team name"
        );
    }

    #[test]
    fn busy_button_refuses_second_submit() {
        let (backend, transport) = backend_with(vec![RawResponse::new(200, "{}")]);
        let action = invite("bob", "bob@example.com");
        let mut button = action.button();

        assert!(button.begin());
        assert!(backend.perform_with(&action, &mut button).is_none());
        assert!(transport.sent().is_empty());

        button.finish();
        assert!(backend.perform_with(&action, &mut button).unwrap().is_ok());
        assert_eq!(button.label(), "Send Invitation");
    }

    #[test]
    fn team_details_unwraps_envelope() {
        let (backend, _) = backend_with(vec![RawResponse::new(
            200,
            r#"{"success": true, "team": {"id": "t1", "name": "Core",
                "created_at": "2023-01-15T12:00:00Z",
                "members": [{"id": "u1", "name": "John Doe", "role": "admin"}],
                "projects": []}}"#,
        )]);
        let team = backend.team_details("t1").unwrap();
        assert_eq!(team.name, "Core");
        assert_eq!(team.members[0].role.as_deref(), Some("admin"));
        assert!(team.created_at.is_some());
    }
}
