//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user entity and its input shapes, password hashing, and the
//! validation rules applied before anything reaches storage.

pub mod constants;
pub mod error;
pub mod password;
pub mod rules;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::{HashCost, Password, PasswordHasher};
pub use rules::{validation_message, UserRules};
pub use user::{NewUser, User, UserPatch};
