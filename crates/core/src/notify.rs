//! Notification kinds and the email templates rendered for each.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

/// Notification kind matching the `notifications.kind` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    EventUpdate,
    EventReminder,
    RegistrationConfirmation,
    WaitlistUpdate,
}

impl NotificationKind {
    /// The column value stored for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventUpdate => "EVENT_UPDATE",
            Self::EventReminder => "EVENT_REMINDER",
            Self::RegistrationConfirmation => "REGISTRATION_CONFIRMATION",
            Self::WaitlistUpdate => "WAITLIST_UPDATE",
        }
    }

    /// Parse a column value back into a kind.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "EVENT_UPDATE" => Ok(Self::EventUpdate),
            "EVENT_REMINDER" => Ok(Self::EventReminder),
            "REGISTRATION_CONFIRMATION" => Ok(Self::RegistrationConfirmation),
            "WAITLIST_UPDATE" => Ok(Self::WaitlistUpdate),
            other => Err(CoreError::Internal(format!(
                "unknown notification kind: {other}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Email templates
// ---------------------------------------------------------------------------

/// A rendered email: subject line plus HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
}

/// Render the email for a notification.
///
/// Each known kind gets its own subject and heading; `kind` is `None` when
/// the stored value no longer parses, which falls back to a bare message so
/// the mail still goes out.
pub fn render_email(kind: Option<NotificationKind>, message: &str) -> EmailTemplate {
    let message = escape_html(message);
    match kind {
        Some(NotificationKind::EventUpdate) => EmailTemplate {
            subject: "Event Update".into(),
            html_body: format!("<h2>Event Update Notification</h2>\n<p>{message}</p>"),
        },
        Some(NotificationKind::EventReminder) => EmailTemplate {
            subject: "Event Reminder".into(),
            html_body: format!("<h2>Upcoming Event Reminder</h2>\n<p>{message}</p>"),
        },
        Some(NotificationKind::RegistrationConfirmation) => EmailTemplate {
            subject: "Registration Confirmed".into(),
            html_body: format!("<h2>Registration Confirmation</h2>\n<p>{message}</p>"),
        },
        Some(NotificationKind::WaitlistUpdate) => EmailTemplate {
            subject: "Waitlist Status Update".into(),
            html_body: format!("<h2>Waitlist Update</h2>\n<p>{message}</p>"),
        },
        None => EmailTemplate {
            subject: "Notification".into(),
            html_body: format!("<p>{message}</p>"),
        },
    }
}

/// Escape the characters HTML treats specially. Messages interpolate user
/// content (event titles), so they cannot go into the body verbatim.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
