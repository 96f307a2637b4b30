//! In-process account store for tests.
//!
//! Enforces the same uniqueness rules as the database indexes so
//! service and HTTP tests can run without Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AccountRepository, RepoResult, RepositoryError, UniqueField};
use domain::{Account, NewAccount};

#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn conflict(accounts: &HashMap<Uuid, Account>, candidate: &Account) -> Option<UniqueField> {
    let others = || accounts.values().filter(|a| a.id != candidate.id);
    if others().any(|a| a.username == candidate.username) {
        Some(UniqueField::Username)
    } else if others().any(|a| a.email == candidate.email) {
        Some(UniqueField::Email)
    } else {
        None
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountStore {
    async fn count_by_username_or_email(&self, username: &str, email: &str) -> RepoResult<u64> {
        let accounts = self.accounts.read().await;
        let count = accounts
            .values()
            .filter(|a| a.username == username || a.email == email)
            .count();
        Ok(count as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.username == username).cloned())
    }

    async fn username_taken_by_other(&self, username: &str, id: Uuid) -> RepoResult<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .any(|a| a.id != id && a.username == username))
    }

    async fn email_taken_by_other(&self, email: &str, id: Uuid) -> RepoResult<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().any(|a| a.id != id && a.email == email))
    }

    async fn insert(&self, new_account: NewAccount) -> RepoResult<Uuid> {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: new_account.username,
            display_name: new_account.display_name,
            email: new_account.email,
            password_hash: new_account.password_hash,
            created_at: now,
            updated_at: now,
        };

        let mut accounts = self.accounts.write().await;
        if let Some(field) = conflict(&accounts, &account) {
            return Err(RepositoryError::UniqueViolation(Some(field)));
        }
        let id = account.id;
        accounts.insert(id, account);
        Ok(id)
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains_key(&account.id) {
            return Err(RepositoryError::Storage(format!(
                "account {} not found",
                account.id
            )));
        }
        if let Some(field) = conflict(&accounts, account) {
            return Err(RepositoryError::UniqueViolation(Some(field)));
        }

        let mut stored = account.clone();
        if let Some(existing) = accounts.get(&account.id) {
            stored.created_at = existing.created_at;
        }
        accounts.insert(account.id, stored);
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        match self.accounts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::Storage(format!("account {} not found", id))),
        }
    }

    async fn ping(&self) -> RepoResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            display_name: "Someone".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_fields() {
        let store = InMemoryAccountStore::new();
        store.insert(new_account("alice", "a@x.com")).await.unwrap();

        assert_eq!(
            store.insert(new_account("alice", "other@x.com")).await,
            Err(RepositoryError::UniqueViolation(Some(UniqueField::Username)))
        );
        assert_eq!(
            store.insert(new_account("bob", "a@x.com")).await,
            Err(RepositoryError::UniqueViolation(Some(UniqueField::Email)))
        );
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_taken_by_other_ignores_self() {
        let store = InMemoryAccountStore::new();
        let id = store.insert(new_account("alice", "a@x.com")).await.unwrap();

        assert!(!store.username_taken_by_other("alice", id).await.unwrap());
        assert!(store
            .username_taken_by_other("alice", Uuid::new_v4())
            .await
            .unwrap());
        assert!(!store.email_taken_by_other("a@x.com", id).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_account_fails() {
        let store = InMemoryAccountStore::new();
        assert!(matches!(
            store.delete(Uuid::new_v4()).await,
            Err(RepositoryError::Storage(_))
        ));
    }
}
