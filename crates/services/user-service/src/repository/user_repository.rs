//! User repository backed by the `users` collection.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::ReturnDocument,
    Collection,
};

use super::entities::user::{self, UserDocument, COLLECTION};
use crate::infra::Database;
use common::{AppError, AppResult, ResultExt};
use domain::{User, UserPatch};

#[cfg(test)]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Identifiers are the 24-character hex form of the store's object ids.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List every user in storage order
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Find user by ID, `NotFound` if there is none
    async fn find_by_id(&self, id: &str) -> AppResult<User>;

    /// Insert a new user and return it with the assigned ID
    async fn create(&self, user: User) -> AppResult<User>;

    /// Set the non-empty fields of `patch` and return the updated user
    async fn update(&self, id: &str, patch: UserPatch) -> AppResult<User>;

    /// Permanently delete user by ID
    async fn delete(&self, id: &str) -> AppResult<()>;
}

/// MongoDB implementation of UserRepository
pub struct UserStore {
    users: Collection<UserDocument>,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(COLLECTION),
        }
    }
}

fn parse_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidIdentifier(id.to_string()))
}

/// Update operation for a patch, `None` when it sets nothing.
fn update_document(patch: &UserPatch) -> Option<Document> {
    let fields = user::set_document(patch);
    if fields.is_empty() {
        return None;
    }
    Some(doc! { "$set": fields })
}

fn updated_or_not_found(document: Option<UserDocument>) -> AppResult<User> {
    document.map(User::from).ok_or(AppError::NotFound)
}

fn deleted_or_not_found(deleted_count: u64) -> AppResult<()> {
    if deleted_count == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_all(&self) -> AppResult<Vec<User>> {
        let cursor = self
            .users
            .find(doc! {})
            .await
            .map_err(AppError::from)
            .context("users.find")?;

        let documents: Vec<UserDocument> = cursor
            .try_collect()
            .await
            .map_err(AppError::from)
            .context("users.find cursor")?;

        Ok(documents.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> AppResult<User> {
        let oid = parse_id(id)?;

        self.users
            .find_one(user::by_id(oid))
            .await
            .map_err(AppError::from)
            .context("users.find_one")?
            .map(User::from)
            .ok_or(AppError::NotFound)
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let mut document = UserDocument::from(user);
        document.id = None;

        let result = self
            .users
            .insert_one(&document)
            .await
            .map_err(AppError::from)
            .context("users.insert_one")?;

        let oid = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::internal("Inserted user has no object id"))?;

        document.id = Some(oid);
        Ok(User::from(document))
    }

    async fn update(&self, id: &str, patch: UserPatch) -> AppResult<User> {
        let oid = parse_id(id)?;

        // Nothing to write
        let Some(update) = update_document(&patch) else {
            return self.find_by_id(id).await;
        };

        let document = self
            .users
            .find_one_and_update(user::by_id(oid), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(AppError::from)
            .context("users.find_one_and_update")?;

        updated_or_not_found(document)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let oid = parse_id(id)?;

        let result = self
            .users
            .delete_one(user::by_id(oid))
            .await
            .map_err(AppError::from)
            .context("users.delete_one")?;

        deleted_or_not_found(result.deleted_count)
    }
}
