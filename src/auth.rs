use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::{Filter, UserStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

/// A user, as registered in the store or supplied by configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Identity {
    /// Identity known only by email; the display name is the local part.
    pub fn from_email(email: &str) -> Self {
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            email: email.to_string(),
            display_name,
            unit: None,
            role: Role::Member,
        }
    }

    /// Name to record as the editor of a change.
    pub fn editor_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.email
        } else {
            &self.display_name
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Gate for editing and management actions.
pub fn require<'a>(identity: Option<&'a Identity>, action: &'static str) -> Result<&'a Identity> {
    identity.ok_or(Error::Unauthenticated(action))
}

/// Gate for user management.
pub fn require_admin<'a>(
    identity: Option<&'a Identity>,
    action: &'static str,
) -> Result<&'a Identity> {
    let user = require(identity, action)?;
    if !user.is_admin() {
        return Err(Error::Forbidden(action));
    }
    Ok(user)
}

/// Sign in as `requested` (an email), else as the configured identity.
///
/// Only registered users may sign in, and the stored record wins over the
/// configured one. While no user is registered at all, the configured
/// identity is taken as given so that the first administrator can be added.
pub fn resolve(
    users: &dyn UserStore,
    requested: Option<&str>,
    configured: Option<Identity>,
) -> Result<Option<Identity>> {
    let email = match (requested, &configured) {
        (Some(email), _) => email.to_string(),
        (None, Some(c)) => c.email.clone(),
        (None, None) => return Ok(None),
    };

    if let Some(user) = users.get_user(&email)? {
        tracing::debug!(action = "user/login", user = %email, "signed in");
        return Ok(Some(user));
    }

    let registry_empty = users.query_users(&Filter::new())?.is_empty();
    match configured.filter(|c| c.email == email) {
        Some(c) if registry_empty => {
            tracing::warn!(user = %email, "no registered users; trusting configured identity");
            Ok(Some(c))
        }
        _ => Err(Error::Unregistered(email)),
    }
}
