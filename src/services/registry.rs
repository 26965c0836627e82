use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::models::Destination;
use crate::services::notification::MessagingProvider;

/// Prefix under which users are registered as direct-message destinations
pub const USER_PREFIX: char = '@';

/// Logical destination name -> provider destination.
///
/// Built once at startup and never mutated afterwards, so it can be shared
/// across request handlers without locking.
#[derive(Debug, Clone, Default)]
pub struct DestinationRegistry {
    entries: HashMap<String, Destination>,
}

impl DestinationRegistry {
    /// Authenticates and loads every known destination from the provider.
    ///
    /// Channels are inserted before groups, so a group wins a name collision.
    /// Authentication and conversation listing failures are fatal. A failed
    /// user listing only disables `@user` destinations.
    pub async fn initialize(provider: &dyn MessagingProvider) -> AppResult<Self> {
        provider.authenticate().await.map_err(unavailable)?;

        let channels = provider.list_channels().await.map_err(unavailable)?;
        let groups = provider.list_groups().await.map_err(unavailable)?;
        let users = match provider.list_users().await {
            Ok(users) => users,
            Err(e) => {
                log::warn!(
                    "User listing failed, direct-message destinations disabled: {}",
                    e
                );
                Vec::new()
            }
        };

        let mut registry = Self::default();
        for entry in channels.into_iter().chain(groups) {
            registry.insert(entry.name, Destination::Channel(entry.id));
        }
        for user in users {
            registry.insert(
                format!("{}{}", USER_PREFIX, user.name),
                Destination::DirectUser(user.id),
            );
        }

        log::info!(
            "Destination registry loaded: {} destinations",
            registry.len()
        );

        Ok(registry)
    }

    /// Builds a registry from known entries (last write wins)
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Destination)>,
        S: Into<String>,
    {
        let mut registry = Self::default();
        for (name, destination) in entries {
            registry.insert(name.into(), destination);
        }
        registry
    }

    fn insert(&mut self, name: String, destination: Destination) {
        if let Some(previous) = self.entries.insert(name.clone(), destination) {
            log::debug!("Destination '{}' shadows {}", name, previous);
        }
    }

    /// Looks up a logical name. `None` means the destination is unknown.
    pub fn resolve(&self, logical_name: &str) -> Option<&Destination> {
        self.entries.get(logical_name.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn unavailable(err: impl std::fmt::Display) -> AppError {
    AppError::ProviderUnavailable(err.to_string())
}
