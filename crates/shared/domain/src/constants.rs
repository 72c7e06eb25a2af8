//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Identifiers
// =============================================================================

/// Length of a hex-encoded document identifier
pub const OBJECT_ID_HEX_LENGTH: usize = 24;

// =============================================================================
// Validation
// =============================================================================

/// Minimum name length requirement
pub const MIN_NAME_LENGTH: usize = 3;

/// Maximum name length requirement
pub const MAX_NAME_LENGTH: usize = 50;

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length requirement
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Characters that satisfy the "special character" password rule
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*";

// =============================================================================
// Password hashing (Argon2id)
// =============================================================================

/// Default memory cost in KiB
pub const DEFAULT_HASH_MEMORY_KIB: u32 = 19_456;

/// Default number of passes
pub const DEFAULT_HASH_ITERATIONS: u32 = 2;

/// Default degree of parallelism
pub const DEFAULT_HASH_PARALLELISM: u32 = 1;
