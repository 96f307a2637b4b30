//! Repository layer for data access.

mod account_repository;
pub mod entities;
#[cfg(any(test, feature = "test-utils"))]
mod memory;

pub use account_repository::{
    AccountRepository, AccountStore, RepoResult, RepositoryError, UniqueField,
};
#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryAccountStore;
