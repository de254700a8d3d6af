//! Inline reply/edit/delete controls on a prompt's comment thread

use maud::{Markup, html};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

pub const DELETE_COMMENT_CONFIRM: &str =
    "Are you sure you want to delete this comment? This cannot be undone.";
pub const DELETE_REPLY_CONFIRM: &str =
    "Are you sure you want to delete this reply? This cannot be undone.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("Not a prompt page: {0}")]
    NotAPromptPage(String),

    #[error("Comment content cannot be empty")]
    EmptyContent,

    #[error("{0} is not being edited")]
    NotEditing(Target),
}

/// Project and prompt the thread belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPage {
    pub project_id: String,
    pub prompt_id: String,
}

impl PromptPage {
    /// `/projects/{project}/prompts/{prompt}[/...]`
    pub fn from_path(path: &str) -> Result<Self, CommentError> {
        let parts: Vec<&str> = path.split('/').collect();
        match parts.as_slice() {
            ["", "projects", project, "prompts", prompt, ..]
                if !project.is_empty() && !prompt.is_empty() =>
            {
                Ok(Self {
                    project_id: project.to_string(),
                    prompt_id: prompt.to_string(),
                })
            }
            _ => Err(CommentError::NotAPromptPage(path.to_string())),
        }
    }

    fn base(&self) -> String {
        format!("/projects/{}/prompts/{}", self.project_id, self.prompt_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Target {
    Comment(i64),
    Reply(i64),
}

impl Target {
    fn segment(self) -> (&'static str, i64) {
        match self {
            Target::Comment(id) => ("comments", id),
            Target::Reply(id) => ("replies", id),
        }
    }

    fn action(self, page: &PromptPage, verb: &str) -> String {
        let (kind, id) = self.segment();
        format!("{}/{kind}/{id}/{verb}", page.base())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Comment(id) => write!(f, "comment {id}"),
            Target::Reply(id) => write!(f, "reply {id}"),
        }
    }
}

/// A POST the page submits on the user's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub action: String,
    pub original: String,
    pub draft: String,
}

impl EditForm {
    pub fn to_html(&self, target: Target) -> Markup {
        let (class, textarea_class, rows) = match target {
            Target::Comment(_) => ("edit-comment-form mt-2 mb-3", "form-control", 3),
            Target::Reply(_) => ("edit-reply-form mt-2", "form-control form-control-sm", 2),
        };
        html! {
            form class=(class) method="POST" action=(self.action) {
                div class="mb-2" {
                    textarea class=(textarea_class) name="content" rows=(rows) required { (self.draft) }
                }
                div class="d-flex justify-content-end" {
                    button type="button" class="btn btn-sm btn-outline-secondary me-2 cancel-edit-btn" { "Cancel" }
                    button type="submit" class="btn btn-sm btn-primary" { "Save changes" }
                }
            }
        }
    }
}

#[derive(Debug)]
pub struct CommentThread {
    page: PromptPage,
    open_reply: Option<i64>,
    editing: BTreeMap<Target, EditForm>,
}

impl CommentThread {
    pub fn new(page: PromptPage) -> Self {
        Self {
            page,
            open_reply: None,
            editing: BTreeMap::new(),
        }
    }

    pub fn open_reply(&self) -> Option<i64> {
        self.open_reply
    }

    /// Show this comment's reply form, closing any other; a second click hides it
    pub fn toggle_reply(&mut self, comment_id: i64) {
        self.open_reply = match self.open_reply {
            Some(open) if open == comment_id => None,
            _ => Some(comment_id),
        };
    }

    pub fn cancel_reply(&mut self, comment_id: i64) {
        if self.open_reply == Some(comment_id) {
            self.open_reply = None;
        }
    }

    /// Swap the content for an edit form prefilled with the trimmed text.
    /// An edit already in progress is kept as is.
    pub fn start_edit(&mut self, target: Target, current_content: &str) -> &EditForm {
        let page = &self.page;
        self.editing.entry(target).or_insert_with(|| {
            let content = current_content.trim().to_string();
            EditForm {
                action: target.action(page, "edit"),
                original: content.clone(),
                draft: content,
            }
        })
    }

    pub fn edit_form(&self, target: Target) -> Option<&EditForm> {
        self.editing.get(&target)
    }

    pub fn is_editing(&self, target: Target) -> bool {
        self.editing.contains_key(&target)
    }

    pub fn set_draft(&mut self, target: Target, draft: &str) -> Result<(), CommentError> {
        let form = self
            .editing
            .get_mut(&target)
            .ok_or(CommentError::NotEditing(target))?;
        form.draft = draft.to_string();
        Ok(())
    }

    /// Drop the form; returns the content to show again
    pub fn cancel_edit(&mut self, target: Target) -> Option<String> {
        self.editing.remove(&target).map(|form| form.original)
    }

    pub fn save_edit(&mut self, target: Target) -> Result<FormSubmission, CommentError> {
        let form = self
            .editing
            .get(&target)
            .ok_or(CommentError::NotEditing(target))?;
        if form.draft.trim().is_empty() {
            return Err(CommentError::EmptyContent);
        }

        let submission = FormSubmission {
            action: form.action.clone(),
            fields: vec![("content".to_string(), form.draft.clone())],
        };
        self.editing.remove(&target);
        tracing::debug!("Submitting edit for {} to {}", target, submission.action);
        Ok(submission)
    }

    /// Ask first; nothing is submitted unless `confirm` agrees
    pub fn delete(
        &self,
        target: Target,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Option<FormSubmission> {
        let question = match target {
            Target::Comment(_) => DELETE_COMMENT_CONFIRM,
            Target::Reply(_) => DELETE_REPLY_CONFIRM,
        };
        if !confirm(question) {
            return None;
        }
        Some(FormSubmission {
            action: target.action(&self.page, "delete"),
            fields: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> CommentThread {
        CommentThread::new(PromptPage::from_path("/projects/7/prompts/42/versions").unwrap())
    }

    #[test]
    fn page_ids_come_from_the_path() {
        let page = PromptPage::from_path("/projects/7/prompts/42").unwrap();
        assert_eq!(page.project_id, "7");
        assert_eq!(page.prompt_id, "42");
        assert!(PromptPage::from_path("/teams/3").is_err());
    }

    #[test]
    fn only_one_reply_form_is_open() {
        let mut thread = thread();
        thread.toggle_reply(1);
        thread.toggle_reply(2);
        assert_eq!(thread.open_reply(), Some(2));

        thread.toggle_reply(2);
        assert_eq!(thread.open_reply(), None);

        thread.toggle_reply(3);
        thread.cancel_reply(1);
        assert_eq!(thread.open_reply(), Some(3));
        thread.cancel_reply(3);
        assert_eq!(thread.open_reply(), None);
    }

    #[test]
    fn edit_prefills_trimmed_content_and_cancel_restores() {
        let mut thread = thread();
        let form = thread.start_edit(Target::Comment(5), "  Looks good \n");
        assert_eq!(form.draft, "Looks good");
        assert_eq!(form.action, "/projects/7/prompts/42/comments/5/edit");

        thread.set_draft(Target::Comment(5), "Changed my mind").unwrap();
        assert_eq!(
            thread.cancel_edit(Target::Comment(5)).as_deref(),
            Some("Looks good")
        );
        assert!(!thread.is_editing(Target::Comment(5)));
    }

    #[test]
    fn save_posts_the_draft() {
        let mut thread = thread();
        thread.start_edit(Target::Reply(9), "old");
        thread.set_draft(Target::Reply(9), "new").unwrap();

        let submission = thread.save_edit(Target::Reply(9)).unwrap();
        assert_eq!(submission.action, "/projects/7/prompts/42/replies/9/edit");
        assert_eq!(submission.fields, vec![("content".to_string(), "new".to_string())]);
        assert!(matches!(
            thread.save_edit(Target::Reply(9)),
            Err(CommentError::NotEditing(Target::Reply(9)))
        ));
    }

    #[test]
    fn empty_draft_is_rejected() {
        let mut thread = thread();
        thread.start_edit(Target::Comment(1), "x");
        thread.set_draft(Target::Comment(1), "   ").unwrap();
        assert_eq!(thread.save_edit(Target::Comment(1)), Err(CommentError::EmptyContent));
        assert!(thread.is_editing(Target::Comment(1)));
    }

    #[test]
    fn delete_requires_confirmation() {
        let thread = thread();
        assert_eq!(thread.delete(Target::Comment(3), |_| false), None);

        let mut asked = String::new();
        let submission = thread
            .delete(Target::Reply(4), |q| {
                asked = q.to_string();
                true
            })
            .unwrap();
        assert_eq!(asked, DELETE_REPLY_CONFIRM);
        assert_eq!(submission.action, "/projects/7/prompts/42/replies/4/delete");
    }

    #[test]
    fn edit_form_markup_escapes_draft() {
        let mut thread = thread();
        let html = thread
            .start_edit(Target::Comment(2), "<b>hi</b>")
            .to_html(Target::Comment(2))
            .into_string();
        assert!(html.contains("&lt;b&gt;hi&lt;/b&gt;"));
        assert!(html.contains(r#"action="/projects/7/prompts/42/comments/2/edit""#));
        assert!(html.contains("Save changes"));
    }
}
