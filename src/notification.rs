use crate::constant::TOAST_HIDE_ANIMATION_MS;
use maud::{Markup, html};
use std::time::{Duration, Instant};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "check-circle",
            ToastKind::Error => "exclamation-circle",
            ToastKind::Info => "info-circle",
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    /// Hide animation running, removed once it finishes
    Hiding { since: Instant },
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
    pub phase: ToastPhase,
}

impl Toast {
    pub fn to_html(&self) -> Markup {
        let shown = if self.phase == ToastPhase::Visible {
            " show"
        } else {
            ""
        };
        html! {
            div class={ "admin-notification " (self.kind.class()) (shown) } data-id=(self.id.to_string()) {
                div class="notification-icon" {
                    i class={ "bi bi-" (self.kind.icon()) } {}
                }
                div class="notification-content" { (self.message) }
                button class="notification-close" { i class="bi bi-x" {} }
            }
        }
    }
}

/// Stack of toasts; time is passed in so callers drive it from their frame loop
#[derive(Debug)]
pub struct Notifications {
    toasts: Vec<Toast>,
    timeout: Duration,
    hide_animation: Duration,
}

impl Notifications {
    pub fn new(timeout: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            timeout,
            hide_animation: Duration::from_millis(TOAST_HIDE_ANIMATION_MS),
        }
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) -> Uuid {
        let id = Uuid::new_v4();
        let message = message.into();
        match kind {
            ToastKind::Error => tracing::warn!("Notification: {}", message),
            _ => tracing::info!("Notification: {}", message),
        }
        self.toasts.push(Toast {
            id,
            kind,
            message,
            shown_at: now,
            phase: ToastPhase::Visible,
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) -> Uuid {
        self.push(ToastKind::Success, message, now)
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> Uuid {
        self.push(ToastKind::Error, message, now)
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) -> Uuid {
        self.push(ToastKind::Info, message, now)
    }

    /// Manual close; the auto-dismiss no longer applies
    pub fn dismiss(&mut self, id: Uuid, now: Instant) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id)
            && toast.phase == ToastPhase::Visible
        {
            toast.phase = ToastPhase::Hiding { since: now };
        }
    }

    /// Advance timers: expire visible toasts, drop finished ones
    pub fn tick(&mut self, now: Instant) {
        let timeout = self.timeout;
        let hide = self.hide_animation;

        for toast in &mut self.toasts {
            if toast.phase == ToastPhase::Visible && now.duration_since(toast.shown_at) >= timeout
            {
                // hide animation starts where the timeout would have fired
                toast.phase = ToastPhase::Hiding {
                    since: toast.shown_at + timeout,
                };
            }
        }

        self.toasts.retain(|toast| match toast.phase {
            ToastPhase::Visible => true,
            ToastPhase::Hiding { since } => now.duration_since(since) < hide,
        });
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    /// Earliest moment a timer fires, for scheduling a repaint
    pub fn next_deadline(&self) -> Option<Instant> {
        self.toasts
            .iter()
            .map(|toast| match toast.phase {
                ToastPhase::Visible => toast.shown_at + self.timeout,
                ToastPhase::Hiding { since } => since + self.hide_animation,
            })
            .min()
    }
}
