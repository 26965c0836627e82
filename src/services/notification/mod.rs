//! Outbound messaging: the provider seam and the summary formatter.
//!
//! The dispatch worker only talks to a [`MessagingProvider`]; the Slack Web
//! API implementation lives in [`slack`].

pub mod slack;

use async_trait::async_trait;

use crate::models::{
    Attachment, ConversationInfo, Destination, Notification, NotificationField, StatusColor,
    Summary,
};

pub use slack::SlackClient;

// =============================================================================
// Provider Errors
// =============================================================================

/// Failure of a single messaging provider call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{method} request failed: {source}")]
    Http {
        method: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} returned HTTP {status}")]
    Status { method: String, status: u16 },

    /// The API answered but refused the call (`ok: false`)
    #[error("{method} rejected: {error}")]
    Api { method: String, error: String },

    #[error("{method} returned an unexpected response: {message}")]
    Decode { method: String, message: String },

    #[error("Invalid provider configuration: {0}")]
    Config(String),
}

// =============================================================================
// Messaging Provider Trait
// =============================================================================

/// Capabilities the service needs from the messaging platform
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Verifies the credentials
    async fn authenticate(&self) -> Result<(), ProviderError>;

    /// Public channels
    async fn list_channels(&self) -> Result<Vec<ConversationInfo>, ProviderError>;

    /// Private channels (groups)
    async fn list_groups(&self) -> Result<Vec<ConversationInfo>, ProviderError>;

    /// Active users that can receive direct messages
    async fn list_users(&self) -> Result<Vec<ConversationInfo>, ProviderError>;

    /// Opens (or reuses) a direct conversation and returns its id
    async fn open_direct_channel(&self, user_id: &str) -> Result<String, ProviderError>;

    async fn send_message(
        &self,
        conversation_id: &str,
        text: &str,
        attachments: &[Attachment],
    ) -> Result<(), ProviderError>;
}

// =============================================================================
// Formatter
// =============================================================================

/// Builds the message for a summary.
///
/// Fields are always Result, Total, Passed, Failed, Skipped; only Result is
/// a long field. The status is `Fail` iff the summary has failures.
pub fn format_notification(summary: &Summary, destination: &Destination) -> Notification {
    let status_color = if summary.has_failures() {
        StatusColor::Fail
    } else {
        StatusColor::Ok
    };

    let result = match status_color {
        StatusColor::Ok => "Passed",
        StatusColor::Fail => "Failed",
    };

    Notification {
        destination: destination.clone(),
        text: format!(
            "*Test Results For {}*",
            escape_markdown(&summary.suite_name)
        ),
        status_color,
        fields: vec![
            NotificationField::new("Result", result, false),
            NotificationField::new("Total", summary.total_tests.to_string(), true),
            NotificationField::new("Passed", summary.passed_count().to_string(), true),
            NotificationField::new("Failed", summary.total_failures.to_string(), true),
            NotificationField::new("Skipped", summary.skipped_count.to_string(), true),
        ],
    }
}

/// Escapes special Slack markdown characters
fn escape_markdown(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
