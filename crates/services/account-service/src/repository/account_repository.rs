//! Account repository contract and its SeaORM implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Unchanged},
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set, SqlErr, Statement,
};
use thiserror::Error;
use uuid::Uuid;

use super::entities::account::{
    self, ActiveModel, Entity as AccountEntity, EMAIL_UNIQUE_INDEX, USERNAME_UNIQUE_INDEX,
};
use domain::{Account, NewAccount};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Field guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
}

/// Persistence failures surfaced to the service layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A write collided with an existing username or email.
    /// `None` when the store could not tell which field.
    #[error("Unique constraint violated")]
    UniqueViolation(Option<UniqueField>),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for repository operations
pub type RepoResult<T> = Result<T, RepositoryError>;

impl From<DbErr> for RepositoryError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                RepositoryError::UniqueViolation(unique_field(&detail))
            }
            _ => RepositoryError::Storage(err.to_string()),
        }
    }
}

/// Identify the violated field from the driver's constraint message.
fn unique_field(detail: &str) -> Option<UniqueField> {
    if detail.contains(USERNAME_UNIQUE_INDEX) {
        Some(UniqueField::Username)
    } else if detail.contains(EMAIL_UNIQUE_INDEX) {
        Some(UniqueField::Email)
    } else {
        None
    }
}

/// Account repository trait for dependency injection.
///
/// Username and email comparisons are exact; no case folding happens here.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Count accounts whose username or email matches
    async fn count_by_username_or_email(&self, username: &str, email: &str) -> RepoResult<u64>;

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>>;

    /// Whether an account other than `id` holds this username
    async fn username_taken_by_other(&self, username: &str, id: Uuid) -> RepoResult<bool>;

    /// Whether an account other than `id` holds this email
    async fn email_taken_by_other(&self, email: &str, id: Uuid) -> RepoResult<bool>;

    /// Persist a new account and return its generated id
    async fn insert(&self, account: NewAccount) -> RepoResult<Uuid>;

    /// Overwrite all mutable fields of an existing account
    async fn update(&self, account: &Account) -> RepoResult<()>;

    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> RepoResult<()>;
}

/// Concrete implementation of AccountRepository over SeaORM
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn taken_by_other(&self, condition: Condition, id: Uuid) -> RepoResult<bool> {
        let count = AccountEntity::find()
            .filter(condition)
            .filter(account::Column::Id.ne(id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn count_by_username_or_email(&self, username: &str, email: &str) -> RepoResult<u64> {
        let count = AccountEntity::find()
            .filter(
                Condition::any()
                    .add(account::Column::Username.eq(username))
                    .add(account::Column::Email.eq(email)),
            )
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Account>> {
        let result = AccountEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(Account::from))
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<Account>> {
        let result = AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(Account::from))
    }

    async fn username_taken_by_other(&self, username: &str, id: Uuid) -> RepoResult<bool> {
        self.taken_by_other(Condition::all().add(account::Column::Username.eq(username)), id)
            .await
    }

    async fn email_taken_by_other(&self, email: &str, id: Uuid) -> RepoResult<bool> {
        self.taken_by_other(Condition::all().add(account::Column::Email.eq(email)), id)
            .await
    }

    async fn insert(&self, new_account: NewAccount) -> RepoResult<Uuid> {
        let now = Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new_account.username),
            display_name: Set(new_account.display_name),
            email: Set(new_account.email),
            password_hash: Set(new_account.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.id)
    }

    async fn update(&self, account: &Account) -> RepoResult<()> {
        let active_model = ActiveModel {
            id: Unchanged(account.id),
            username: Set(account.username.clone()),
            display_name: Set(account.display_name.clone()),
            email: Set(account.email.clone()),
            password_hash: Set(account.password_hash.clone()),
            created_at: NotSet,
            updated_at: Set(account.updated_at),
        };

        active_model.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = AccountEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::Storage(format!("account {} not found", id)));
        }

        Ok(())
    }

    async fn ping(&self) -> RepoResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
