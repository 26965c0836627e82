use serde::Serialize;

/// A resolved delivery target.
///
/// The kind is fixed when the registry is built, so delivery never has to
/// infer it from the shape of the provider id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Destination {
    /// Public channel or private group, addressable as-is
    Channel(String),
    /// A user; a direct conversation must be opened before sending
    DirectUser(String),
}

impl Destination {
    /// Provider id of the channel or user
    pub fn id(&self) -> &str {
        match self {
            Destination::Channel(id) | Destination::DirectUser(id) => id,
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Destination::DirectUser(_))
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Destination::Channel(id) => write!(f, "channel:{}", id),
            Destination::DirectUser(id) => write!(f, "user:{}", id),
        }
    }
}

/// One entry of a provider listing (channel, group or user)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationInfo {
    pub id: String,
    pub name: String,
}

impl ConversationInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
