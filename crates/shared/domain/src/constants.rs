//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum username length
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Minimum display name length (after trimming)
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum display name length (after trimming)
pub const MAX_NAME_LENGTH: usize = 32;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Memory cost in KiB
pub const HASH_MEMORY_COST_KIB: u32 = 19 * 1024;

/// Number of passes over memory
pub const HASH_TIME_COST: u32 = 2;

/// Degree of parallelism
pub const HASH_PARALLELISM: u32 = 1;

// =============================================================================
// Authentication
// =============================================================================

/// Default token lifetime in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 72;

/// Longest accepted token lifetime in hours (one year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
