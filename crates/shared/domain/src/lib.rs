//! Domain layer - Core account entities, value objects and rules.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the account entity, the credential hasher, the input validators and the
//! failure taxonomy shared by the service and the HTTP gateway.

pub mod account;
pub mod constants;
pub mod error;
pub mod password;
pub mod validation;

pub use account::{Account, AccountProfile, NewAccount, ProfileUpdate};
pub use constants::*;
pub use error::{DomainError, DomainResult, ErrorCategory, TokenError, ValidationError};
pub use password::Password;
