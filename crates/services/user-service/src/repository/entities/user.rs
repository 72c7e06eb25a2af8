//! User document stored in the `users` collection.

use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use domain::{User, UserPatch};

/// Collection name
pub const COLLECTION: &str = "users";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
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

/// Convert domain entity to a document, leaving `_id` to the store
impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        UserDocument {
            id: ObjectId::parse_str(&user.id).ok(),
            name: user.name,
            age: user.age.filter(|age| *age != 0),
            email: user.email.filter(|v| !v.is_empty()),
            password: user.password,
            address: user.address.filter(|v| !v.is_empty()),
        }
    }
}

/// Convert stored document to domain entity
impl From<UserDocument> for User {
    fn from(document: UserDocument) -> Self {
        User {
            id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: document.name,
            age: document.age,
            email: document.email,
            password: document.password,
            address: document.address,
        }
    }
}

/// Build the `$set` fields for a patch, skipping empty and zero values.
///
/// `password` is expected to already be hashed.
pub fn set_document(patch: &UserPatch) -> Document {
    let mut fields = Document::new();

    if let Some(name) = patch.name.as_deref().filter(|v| !v.is_empty()) {
        fields.insert("name", name);
    }
    if let Some(age) = patch.age.filter(|age| *age != 0) {
        fields.insert("age", i64::from(age));
    }
    if let Some(email) = patch.email.as_deref().filter(|v| !v.is_empty()) {
        fields.insert("email", email);
    }
    if let Some(password) = patch.password.as_deref().filter(|v| !v.is_empty()) {
        fields.insert("password", password);
    }
    if let Some(address) = patch.address.as_deref().filter(|v| !v.is_empty()) {
        fields.insert("address", address);
    }

    fields
}

/// Filter matching a single document by identifier
pub fn by_id(id: ObjectId) -> Document {
    doc! { "_id": id }
}
