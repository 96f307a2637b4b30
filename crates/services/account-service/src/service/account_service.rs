//! Account service - registration, login and self-service profile management.
//!
//! Every operation validates its input before touching the repository.
//! Hashing work runs on the blocking pool so it never stalls the runtime.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::repository::{AccountRepository, RepositoryError, UniqueField};
use crate::token::{TokenResponse, TokenService};
use domain::validation::{
    validate_email, validate_name, validate_password, validate_password_length, validate_username,
};
use domain::{AccountProfile, DomainError, DomainResult, NewAccount, Password, ProfileUpdate};

/// Digest checked against when the username is unknown, so both login
/// failure paths cost one hash verification.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| {
    Password::hash("dummy-password-never-matches")
        .ok()
        .map(Password::into_string)
});

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::UniqueViolation(_) => DomainError::DuplicateAccount,
            RepositoryError::Storage(msg) => DomainError::internal(msg),
        }
    }
}

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create a new account
    async fn register(
        &self,
        username: String,
        display_name: String,
        email: String,
        password: String,
    ) -> DomainResult<()>;

    /// Check credentials and issue a bearer token
    async fn login(&self, username: String, password: String) -> DomainResult<TokenResponse>;

    async fn get_profile(&self, account_id: Uuid) -> DomainResult<AccountProfile>;

    /// Apply the provided, non-empty profile fields
    async fn update_profile(
        &self,
        account_id: Uuid,
        update: ProfileUpdate,
    ) -> DomainResult<AccountProfile>;

    async fn change_password(
        &self,
        account_id: Uuid,
        old_password: String,
        new_password: String,
        confirm_password: String,
    ) -> DomainResult<()>;

    /// Remove the account after re-confirming its password
    async fn delete_account(&self, account_id: Uuid, password: String) -> DomainResult<()>;

    /// Verify a bearer token and return the account it was issued for
    fn authenticate(&self, token: &str) -> DomainResult<Uuid>;

    /// Check that storage is reachable
    async fn health(&self) -> DomainResult<()>;
}

/// Concrete implementation of AccountService.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
    tokens: Arc<TokenService>,
}

impl AccountManager {
    pub fn new(repo: Arc<dyn AccountRepository>, tokens: Arc<TokenService>) -> Self {
        Self { repo, tokens }
    }
}

async fn hash_password(plain: String) -> DomainResult<Password> {
    tokio::task::spawn_blocking(move || Password::hash(&plain))
        .await
        .map_err(|e| {
            error!("Hashing task failed: {}", e);
            DomainError::HashingFailure
        })?
}

/// Verify `plain` against `hash`, or against the dummy digest when `None`.
async fn verify_password(hash: Option<String>, plain: String) -> DomainResult<bool> {
    tokio::task::spawn_blocking(move || match hash {
        Some(hash) => Password::from_hash(hash).verify(&plain),
        None => {
            let dummy = DUMMY_HASH.as_deref().unwrap_or_default();
            Password::from_hash(dummy).verify(&plain);
            false
        }
    })
    .await
    .map_err(|e| {
        error!("Verification task failed: {}", e);
        DomainError::HashingFailure
    })
}

fn provided(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl AccountService for AccountManager {
    async fn register(
        &self,
        username: String,
        display_name: String,
        email: String,
        password: String,
    ) -> DomainResult<()> {
        validate_username(&username)?;
        validate_name(&display_name)?;
        validate_email(&email)?;
        validate_password(&password)?;

        if self.repo.count_by_username_or_email(&username, &email).await? > 0 {
            warn!(username = %username, "Registration rejected: account exists");
            return Err(DomainError::DuplicateAccount);
        }

        let password_hash = hash_password(password).await?.into_string();
        let new_account = NewAccount {
            username,
            display_name: display_name.trim().to_string(),
            email,
            password_hash,
        };

        match self.repo.insert(new_account).await {
            Ok(account_id) => {
                info!(account_id = %account_id, "Account registered");
                Ok(())
            }
            Err(RepositoryError::UniqueViolation(field)) => {
                warn!(?field, "Registration lost a uniqueness race");
                Err(DomainError::DuplicateAccount)
            }
            Err(RepositoryError::Storage(msg)) => {
                error!("Failed to insert account: {}", msg);
                Err(DomainError::internal(msg))
            }
        }
    }

    async fn login(&self, username: String, password: String) -> DomainResult<TokenResponse> {
        validate_username(&username)?;
        validate_password_length(&password)?;

        let account = self.repo.find_by_username(&username).await?;
        let stored_hash = account.as_ref().map(|a| a.password_hash.clone());
        let password_valid = verify_password(stored_hash, password).await?;

        let account = match account {
            Some(account) if password_valid => account,
            _ => {
                warn!(username = %username, "Login rejected");
                return Err(DomainError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(account.id)?;
        info!(account_id = %account.id, "Login succeeded");

        Ok(self.tokens.response(token))
    }

    async fn get_profile(&self, account_id: Uuid) -> DomainResult<AccountProfile> {
        self.repo
            .find_by_id(account_id)
            .await?
            .map(AccountProfile::from)
            .ok_or(DomainError::AccountNotFound)
    }

    async fn update_profile(
        &self,
        account_id: Uuid,
        update: ProfileUpdate,
    ) -> DomainResult<AccountProfile> {
        let username = provided(update.username);
        let display_name = provided(update.display_name);
        let email = provided(update.email);

        if let Some(username) = &username {
            validate_username(username)?;
        }
        if let Some(display_name) = &display_name {
            validate_name(display_name)?;
        }
        if let Some(email) = &email {
            validate_email(email)?;
        }

        let mut account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        let mut changed = false;

        let username_changed = match username.filter(|u| *u != account.username) {
            Some(username) => {
                if self
                    .repo
                    .username_taken_by_other(&username, account_id)
                    .await?
                {
                    return Err(DomainError::UsernameTaken);
                }
                account.set_username(username);
                changed = true;
                true
            }
            None => false,
        };

        if let Some(display_name) = display_name
            .map(|n| n.trim().to_string())
            .filter(|n| *n != account.display_name)
        {
            account.set_display_name(display_name);
            changed = true;
        }

        if let Some(email) = email.filter(|e| *e != account.email) {
            if self.repo.email_taken_by_other(&email, account_id).await? {
                return Err(DomainError::EmailTaken);
            }
            account.set_email(email);
            changed = true;
        }

        if !changed {
            debug!(account_id = %account_id, "Profile update changed nothing");
            return Ok(AccountProfile::from(account));
        }

        match self.repo.update(&account).await {
            Ok(()) => {
                info!(account_id = %account_id, "Profile updated");
                Ok(AccountProfile::from(account))
            }
            Err(RepositoryError::UniqueViolation(Some(UniqueField::Username))) => {
                Err(DomainError::UsernameTaken)
            }
            Err(RepositoryError::UniqueViolation(Some(UniqueField::Email))) => {
                Err(DomainError::EmailTaken)
            }
            Err(RepositoryError::UniqueViolation(None)) if username_changed => {
                Err(DomainError::UsernameTaken)
            }
            Err(RepositoryError::UniqueViolation(None)) => Err(DomainError::EmailTaken),
            Err(RepositoryError::Storage(msg)) => {
                error!(account_id = %account_id, "Failed to update profile: {}", msg);
                Err(DomainError::UpdateFailed)
            }
        }
    }

    async fn change_password(
        &self,
        account_id: Uuid,
        old_password: String,
        new_password: String,
        confirm_password: String,
    ) -> DomainResult<()> {
        validate_password(&new_password)?;
        if new_password != confirm_password {
            return Err(DomainError::PasswordMismatch);
        }

        let mut account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        if !verify_password(Some(account.password_hash.clone()), old_password).await? {
            warn!(account_id = %account_id, "Password change rejected: wrong current password");
            return Err(DomainError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password).await?.into_string();
        account.set_password_hash(password_hash);

        self.repo.update(&account).await.map_err(|e| {
            error!(account_id = %account_id, "Failed to store new password: {}", e);
            DomainError::UpdateFailed
        })?;

        info!(account_id = %account_id, "Password changed");
        Ok(())
    }

    async fn delete_account(&self, account_id: Uuid, password: String) -> DomainResult<()> {
        let account = self
            .repo
            .find_by_id(account_id)
            .await?
            .ok_or(DomainError::AccountNotFound)?;

        if !verify_password(Some(account.password_hash), password).await? {
            warn!(account_id = %account_id, "Account deletion rejected: wrong password");
            return Err(DomainError::PasswordMismatch);
        }

        self.repo.delete(account_id).await.map_err(|e| {
            error!(account_id = %account_id, "Failed to delete account: {}", e);
            DomainError::DeleteFailed
        })?;

        info!(account_id = %account_id, "Account deleted");
        Ok(())
    }

    fn authenticate(&self, token: &str) -> DomainResult<Uuid> {
        self.tokens.verify(token).map_err(|kind| {
            debug!("Bearer token rejected: {}", kind);
            DomainError::Token(kind)
        })
    }

    async fn health(&self) -> DomainResult<()> {
        self.repo.ping().await.map_err(|e| {
            error!("Storage health check failed: {}", e);
            DomainError::internal(e.to_string())
        })
    }
}
