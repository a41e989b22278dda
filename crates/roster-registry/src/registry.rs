use std::collections::BTreeMap;
use std::io::Write;

use chrono::{SecondsFormat, Utc};
use fastrace::trace;
use roster_config::{RegistryConfig, Timestamps};
use roster_types::User;
use tracing::{error, info, warn};

use crate::error::RegistryError;
use crate::validation::is_valid_email;

/// Owns every registered [`User`] in insertion order.
///
/// Usernames are unique. Records are never mutated or removed once stored.
#[derive(Debug)]
pub struct UserRegistry {
    users: Vec<User>,
    settings: BTreeMap<String, String>,
    debug_enabled: bool,
    max_users: usize,
    timestamps: Timestamps,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        let mut settings = BTreeMap::new();
        settings.insert("database_url".to_string(), config.database_url);
        settings.insert("api_endpoint".to_string(), config.api_endpoint);
        settings.insert(
            "debug_enabled".to_string(),
            config.debug_enabled.to_string(),
        );

        if config.debug_enabled {
            info!("UserRegistry initialized");
        }

        Self {
            users: Vec::new(),
            settings,
            debug_enabled: config.debug_enabled,
            max_users: config.max_users,
            timestamps: config.timestamps,
        }
    }

    /// Registers a user, logging the reason for any rejection.
    ///
    /// Returns `false` when the username is taken, the email fails
    /// [`is_valid_email`], or the record could not be stored.
    #[trace]
    pub fn create_user(&mut self, username: &str, email: &str) -> bool {
        match self.try_create_user(username, email) {
            Ok(_) => {
                info!("Created user {}", username);
                true
            }
            Err(RegistryError::DuplicateUsername(_)) => {
                error!("User {} already exists", username);
                false
            }
            Err(RegistryError::InvalidEmail(_)) => {
                warn!("Invalid email format: {}", email);
                false
            }
            Err(e) => {
                error!("Failed to create user {}: {}", username, e);
                false
            }
        }
    }

    #[trace]
    pub fn try_create_user(&mut self, username: &str, email: &str) -> Result<&User, RegistryError> {
        if self.find_user(username).is_some() {
            return Err(RegistryError::DuplicateUsername(username.to_string()));
        }

        if !is_valid_email(email) {
            return Err(RegistryError::InvalidEmail(email.to_string()));
        }

        if self.users.len() >= self.max_users {
            return Err(RegistryError::CapacityExceeded {
                max: self.max_users,
            });
        }

        let user = User::with_created_at(username, email, self.timestamp());
        let index = self.users.len();
        self.users.push(user);
        Ok(&self.users[index])
    }

    #[trace]
    pub fn find_user(&self, username: &str) -> Option<&User> {
        let found = self.users.iter().find(|u| u.username() == username);

        if found.is_none() && self.debug_enabled {
            warn!("User {} not found", username);
        }
        found
    }

    pub fn require_user(&self, username: &str) -> Result<&User, RegistryError> {
        self.find_user(username)
            .ok_or_else(|| RegistryError::UserNotFound(username.to_string()))
    }

    /// Logs the record count, then writes one line per user to `out`.
    #[trace]
    pub fn list_users<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        info!("Listing all users ({} total):", self.users.len());
        for user in &self.users {
            writeln!(out, "{}", user)?;
        }
        out.flush()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    fn timestamp(&self) -> String {
        match self.timestamps {
            Timestamps::Fixed => roster_types::PLACEHOLDER_CREATED_AT.to_string(),
            Timestamps::Now => Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
