use serde::Serialize;

use super::Destination;

/// Overall status of a notification, rendered as the attachment color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Ok,
    Fail,
}

impl StatusColor {
    /// Hex color understood by Slack attachments
    pub fn hex(self) -> &'static str {
        match self {
            StatusColor::Ok => "#008000",
            StatusColor::Fail => "#FF0000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationField {
    pub title: String,
    pub value: String,
    /// Short fields are laid out side by side
    pub short: bool,
}

impl NotificationField {
    pub fn new(title: &str, value: impl Into<String>, short: bool) -> Self {
        Self {
            title: title.to_string(),
            value: value.into(),
            short,
        }
    }
}

/// Colored block of fields attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub color: StatusColor,
    pub fields: Vec<NotificationField>,
}

/// A fully formatted message addressed to a resolved destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub destination: Destination,
    pub text: String,
    pub status_color: StatusColor,
    pub fields: Vec<NotificationField>,
}

impl Notification {
    pub fn attachments(&self) -> Vec<Attachment> {
        vec![Attachment {
            color: self.status_color,
            fields: self.fields.clone(),
        }]
    }

    /// Looks up a field value by title
    pub fn field(&self, title: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.title == title)
            .map(|f| f.value.as_str())
    }
}
