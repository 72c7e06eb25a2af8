//! User domain entity and related types.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// User domain entity
///
/// `password` always holds a hash once the user has been through the
/// service layer. `id` is empty until the store assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl User {
    /// Build an unsaved user from a validated draft and its password hash
    pub fn from_draft(draft: NewUser, password_hash: String) -> Self {
        Self {
            id: String::new(),
            name: draft.name,
            age: draft.age,
            email: draft.email,
            password: password_hash,
            address: draft.address,
        }
    }
}

/// User creation data transfer object
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct NewUser {
    /// Display name (letters and spaces)
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "zero_as_none")]
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Plain text password, hashed before it is stored
    #[serde(default)]
    pub password: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 5, message = "Address must be at least 5 characters"))]
    pub address: Option<String>,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("address", &self.address)
            .finish()
    }
}

/// User update data transfer object
///
/// Empty strings and a zero age deserialize as `None`, so a patch can never
/// clear a stored field.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Validate)]
pub struct UserPatch {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "zero_as_none")]
    #[validate(range(min = 1, message = "Age must be at least 1"))]
    pub age: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub password: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(min = 5, message = "Address must be at least 5 characters"))]
    pub address: Option<String>,
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("address", &self.address)
            .finish()
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_empty()))
}

fn zero_as_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<u32>::deserialize(deserializer)?;
    Ok(value.filter(|age| *age != 0))
}
