//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account domain entity
#[derive(Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Don't expose the password hash in debug output
impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl Account {
    /// Replace the username
    pub fn set_username(&mut self, username: String) {
        self.username = username;
        self.updated_at = Utc::now();
    }

    /// Replace the display name
    pub fn set_display_name(&mut self, display_name: String) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    /// Replace the email address
    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Replace the stored password digest
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}

/// Data required to persist a new account. The store assigns id and timestamps.
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Requested profile changes. `None` or empty values leave the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Account profile (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// Unique account identifier
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountProfile {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            display_name: account.display_name,
            email: account.email,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            display_name: "Alice A".to_string(),
            email: "alice@x.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_serialization_omits_password_hash() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let output = format!("{:?}", sample());
        assert!(output.contains("[REDACTED]"));
        assert!(!output.contains("secret"));
    }

    #[test]
    fn test_profile_strips_hash_and_keeps_identity() {
        let account = sample();
        let profile = AccountProfile::from(account.clone());
        assert_eq!(profile.id, account.id);
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.email, "alice@x.com");
    }

    #[test]
    fn test_setters_touch_updated_at() {
        let mut account = sample();
        let before = account.updated_at;
        account.set_email("new@x.com".to_string());
        assert_eq!(account.email, "new@x.com");
        assert!(account.updated_at >= before);
    }
}
