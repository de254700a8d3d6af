//! Confirmation modals: open with a request context, confirm, settle.
//!
//! The context lives inside the open modal. Opening a new one replaces it,
//! so a confirm always acts on what the user was shown.

use crate::backend::remote_backend::ActionButton;
use crate::backend::{ActionOutcome, AdminAction, AdminBackend};

/// Radio choice in the prompt save confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionAction {
    #[default]
    UpdateExisting,
    CreateNew,
}

impl VersionAction {
    /// Value submitted in the `version_action` form field
    pub fn form_value(self) -> &'static str {
        match self {
            VersionAction::UpdateExisting => "update",
            VersionAction::CreateNew => "new_version",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmRequest {
    Admin(AdminAction),
    /// Saving a prompt edit over the current version
    PromptSave { choice: VersionAction },
    SetActive { version: i64, url: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Primary,
}

/// Everything a dialog widget needs to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub warning: Option<String>,
    pub confirm_label: String,
    pub tone: Tone,
    pub choice: Option<VersionAction>,
}

impl Dialog {
    pub fn for_request(request: &ConfirmRequest) -> Self {
        match request {
            ConfirmRequest::Admin(AdminAction::SetAdmin {
                username, grant, ..
            }) => {
                let (title, verb, warning, label, tone) = if *grant {
                    (
                        "Grant Admin Privileges",
                        "grant",
                        "Admin users have full access to all systems and can modify any settings.",
                        "Grant Admin Rights",
                        Tone::Success,
                    )
                } else {
                    (
                        "Remove Admin Privileges",
                        "revoke",
                        "Removing admin rights will restrict this user from accessing administrative functions.",
                        "Revoke Admin Rights",
                        Tone::Danger,
                    )
                };
                Self {
                    title: title.to_string(),
                    message: format!(
                        "Are you sure you want to {verb} admin privileges for {username}?"
                    ),
                    warning: Some(warning.to_string()),
                    confirm_label: label.to_string(),
                    tone,
                    choice: None,
                }
            }
            ConfirmRequest::Admin(AdminAction::DeleteTeam { team_name, .. }) => Self {
                title: "Delete Team".to_string(),
                message: format!("Are you sure you want to delete the team {team_name}?"),
                warning: Some(
                    "This action cannot be undone and will remove all team associations."
                        .to_string(),
                ),
                confirm_label: "Delete".to_string(),
                tone: Tone::Danger,
                choice: None,
            },
            ConfirmRequest::Admin(AdminAction::ResendInvite { email, .. }) => Self {
                title: "Resend Invitation".to_string(),
                message: format!("Send a new invitation to {email}?"),
                warning: None,
                confirm_label: "Resend Invitation".to_string(),
                tone: Tone::Primary,
                choice: None,
            },
            ConfirmRequest::Admin(AdminAction::Invite(invite)) => Self {
                title: "Invite User".to_string(),
                message: format!("Send an invitation to {}?", invite.email),
                warning: None,
                confirm_label: "Send Invitation".to_string(),
                tone: Tone::Primary,
                choice: None,
            },
            ConfirmRequest::Admin(AdminAction::CreateTeam { name, .. }) => Self {
                title: "Create Team".to_string(),
                message: format!("Create the team {name}?"),
                warning: None,
                confirm_label: "Create Team".to_string(),
                tone: Tone::Primary,
                choice: None,
            },
            ConfirmRequest::SetActive { version, .. } => Self {
                title: "Set Active Version".to_string(),
                message: format!("Make version {version} the active version of this prompt?"),
                warning: Some("The current active version will be deactivated.".to_string()),
                confirm_label: format!("Set Version {version} as Active"),
                tone: Tone::Success,
                choice: None,
            },
            ConfirmRequest::PromptSave { choice } => Self {
                title: "Update Existing Version".to_string(),
                message: "You are about to overwrite the current version of this prompt."
                    .to_string(),
                warning: Some("Choose whether to update it in place or save a new version.".to_string()),
                confirm_label: "Confirm".to_string(),
                tone: Tone::Primary,
                choice: Some(*choice),
            },
        }
    }
}

/// The widget side of a modal
pub trait DialogService {
    fn show(&mut self, dialog: &Dialog);
    fn hide(&mut self);
}

/// Holds the last dialog shown; immediate-mode UIs read it back each frame
#[derive(Debug, Default)]
pub struct RetainedDialog {
    current: Option<Dialog>,
}

impl RetainedDialog {
    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }
}

impl DialogService for RetainedDialog {
    fn show(&mut self, dialog: &Dialog) {
        self.current = Some(dialog.clone());
    }

    fn hide(&mut self) {
        self.current = None;
    }
}

struct OpenModal {
    request: ConfirmRequest,
    button: ActionButton,
}

pub struct ConfirmationModal<D: DialogService> {
    dialog: D,
    open: Option<OpenModal>,
}

impl<D: DialogService> ConfirmationModal<D> {
    pub fn new(dialog: D) -> Self {
        Self { dialog, open: None }
    }

    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn request(&self) -> Option<&ConfirmRequest> {
        self.open.as_ref().map(|m| &m.request)
    }

    pub fn button(&self) -> Option<&ActionButton> {
        self.open.as_ref().map(|m| &m.button)
    }

    pub fn open(&mut self, request: ConfirmRequest) {
        let button = match &request {
            ConfirmRequest::Admin(action) => action.button(),
            ConfirmRequest::PromptSave { .. } => ActionButton::new("Confirm", "Saving..."),
            ConfirmRequest::SetActive { version, .. } => {
                ActionButton::new(format!("Set Version {version} as Active"), "Processing...")
            }
        };
        self.dialog.show(&Dialog::for_request(&request));
        self.open = Some(OpenModal { request, button });
    }

    /// Change the radio in the prompt save dialog
    pub fn choose(&mut self, choice: VersionAction) {
        if let Some(OpenModal {
            request: ConfirmRequest::PromptSave { choice: current },
            ..
        }) = &mut self.open
        {
            *current = choice;
            let dialog = Dialog::for_request(&ConfirmRequest::PromptSave { choice });
            self.dialog.show(&dialog);
        }
    }

    /// Mark the confirm button busy and hand out the context to submit.
    /// `None` when nothing is open or a submit is already running.
    pub fn confirm(&mut self) -> Option<ConfirmRequest> {
        let open = self.open.as_mut()?;
        if !open.button.begin() {
            tracing::debug!("Ignoring confirm while a request is in flight");
            return None;
        }
        Some(open.request.clone())
    }

    /// Report how the submitted request went. Success closes the modal,
    /// failure keeps it open with the button restored.
    pub fn settle(&mut self, succeeded: bool) {
        if let Some(open) = self.open.as_mut() {
            open.button.finish();
        }
        if succeeded {
            self.close();
        }
    }

    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.open = None;
        self.dialog.hide();
    }

    /// Synchronous confirm for admin actions
    pub fn submit(&mut self, backend: &AdminBackend) -> Option<Result<ActionOutcome, String>> {
        let ConfirmRequest::Admin(action) = self.confirm()? else {
            // only admin actions go through the admin backend
            self.settle(false);
            return None;
        };
        let result = backend.perform(&action);
        self.settle(result.is_ok());
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RemoteClient;
    use crate::backend::remote_backend::RawResponse;
    use crate::backend::remote_backend::tests::MockTransport;

    #[derive(Default)]
    struct RecordingDialog {
        shown: Vec<Dialog>,
        hidden: usize,
    }

    impl DialogService for RecordingDialog {
        fn show(&mut self, dialog: &Dialog) {
            self.shown.push(dialog.clone());
        }

        fn hide(&mut self) {
            self.hidden += 1;
        }
    }

    fn set_admin(user_id: i64, username: &str, grant: bool) -> ConfirmRequest {
        ConfirmRequest::Admin(AdminAction::SetAdmin {
            user_id,
            username: username.to_string(),
            grant,
        })
    }

    #[test]
    fn admin_dialog_text_follows_direction() {
        let grant = Dialog::for_request(&set_admin(1, "dave", true));
        assert_eq!(grant.title, "Grant Admin Privileges");
        assert_eq!(grant.message, "Are you sure you want to grant admin privileges for dave?");
        assert_eq!(grant.confirm_label, "Grant Admin Rights");
        assert_eq!(grant.tone, Tone::Success);

        let revoke = Dialog::for_request(&set_admin(1, "dave", false));
        assert_eq!(revoke.title, "Remove Admin Privileges");
        assert_eq!(revoke.confirm_label, "Revoke Admin Rights");
        assert_eq!(revoke.tone, Tone::Danger);
    }

    #[test]
    fn reopening_replaces_the_context() {
        let mut modal = ConfirmationModal::new(RecordingDialog::default());
        modal.open(set_admin(1, "dave", true));
        modal.open(set_admin(2, "erin", false));

        assert_eq!(modal.confirm(), Some(set_admin(2, "erin", false)));
        assert_eq!(modal.dialog().shown.len(), 2);
    }

    #[test]
    fn confirm_is_refused_while_busy() {
        let mut modal = ConfirmationModal::new(RecordingDialog::default());
        assert_eq!(modal.confirm(), None);

        modal.open(set_admin(1, "dave", true));
        assert!(modal.confirm().is_some());
        assert_eq!(modal.button().unwrap().label(), "Processing...");
        assert!(modal.confirm().is_none());

        modal.settle(false);
        assert!(modal.is_open());
        assert_eq!(modal.button().unwrap().label(), "Grant Admin Rights");

        modal.settle(true);
        assert!(!modal.is_open());
        assert_eq!(modal.dialog().hidden, 1);
    }

    #[test]
    fn submit_runs_the_admin_action() {
        let transport = MockTransport::with(vec![
            Ok(RawResponse::new(404, r#"{"detail": "User not found"}"#)),
            Ok(RawResponse::new(200, "{}")),
        ]);
        let backend = AdminBackend::new(RemoteClient::new(transport));
        let mut modal = ConfirmationModal::new(RetainedDialog::default());

        modal.open(set_admin(5, "frank", true));
        let failed = modal.submit(&backend).unwrap();
        assert_eq!(failed.unwrap_err(), "The user no longer exists in the system.");
        assert!(modal.dialog().current().is_some());

        let ok = modal.submit(&backend).unwrap().unwrap();
        assert_eq!(ok.message, "Admin privileges granted successfully");
        assert!(modal.dialog().current().is_none());
    }

    #[test]
    fn prompt_save_choice_reaches_the_form() {
        let mut modal = ConfirmationModal::new(RetainedDialog::default());
        modal.open(ConfirmRequest::PromptSave {
            choice: VersionAction::UpdateExisting,
        });
        modal.choose(VersionAction::CreateNew);
        assert_eq!(
            modal.dialog().current().unwrap().choice,
            Some(VersionAction::CreateNew)
        );

        let Some(ConfirmRequest::PromptSave { choice }) = modal.confirm() else {
            panic!("expected prompt save");
        };
        assert_eq!(choice.form_value(), "new_version");
        modal.settle(true);
        assert!(!modal.is_open());
    }

    #[test]
    fn team_delete_names_the_team() {
        let dialog = Dialog::for_request(&ConfirmRequest::Admin(AdminAction::DeleteTeam {
            team_id: "t9".to_string(),
            team_name: "Search".to_string(),
        }));
        assert_eq!(dialog.message, "Are you sure you want to delete the team Search?");
        assert!(dialog.warning.unwrap().starts_with("This action cannot be undone"));
    }
}
