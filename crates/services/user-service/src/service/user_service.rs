//! User service - Handles user-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, ResultExt};
use domain::{NewUser, PasswordHasher, User, UserPatch, UserRules};

use crate::repository::UserRepository;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all users
    async fn get_all_users(&self) -> AppResult<Vec<User>>;

    /// Get user by ID
    async fn get_user(&self, id: &str) -> AppResult<User>;

    /// Validate a draft, hash its password and store it
    async fn create_user(&self, draft: NewUser) -> AppResult<User>;

    /// Apply a partial update; present fields are validated like on create
    async fn update_user(&self, id: &str, patch: UserPatch) -> AppResult<User>;

    /// Delete user by ID
    async fn delete_user(&self, id: &str) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    rules: UserRules,
    hasher: PasswordHasher,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>, rules: UserRules, hasher: PasswordHasher) -> Self {
        Self {
            repo,
            rules,
            hasher,
        }
    }

    /// Argon2 is CPU bound, keep it off the async workers.
    async fn hash_password(&self, plain_text: String) -> AppResult<String> {
        let hasher = self.hasher.clone();
        let password = tokio::task::spawn_blocking(move || hasher.hash(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password hash task failed: {}", e)))??;
        Ok(password.into_string())
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn get_all_users(&self) -> AppResult<Vec<User>> {
        self.repo.find_all().await.context("get all users")
    }

    async fn get_user(&self, id: &str) -> AppResult<User> {
        self.rules.check_id(id)?;
        self.repo.find_by_id(id).await.context("get user")
    }

    async fn create_user(&self, draft: NewUser) -> AppResult<User> {
        self.rules.check_fields(&draft)?;
        self.rules.check_name(&draft.name)?;
        self.rules.check_password(&draft.password)?;

        let hash = self.hash_password(draft.password.clone()).await?;
        let user = User::from_draft(draft, hash);

        let created = self.repo.create(user).await.context("create user")?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn update_user(&self, id: &str, mut patch: UserPatch) -> AppResult<User> {
        self.rules.check_id(id)?;
        self.rules.check_fields(&patch)?;

        if let Some(name) = patch.name.as_deref() {
            self.rules.check_name(name)?;
        }
        if let Some(password) = patch.password.take() {
            self.rules.check_password(&password)?;
            patch.password = Some(self.hash_password(password).await?);
        }

        let updated = self.repo.update(id, patch).await.context("update user")?;
        tracing::info!(user_id = %updated.id, "User updated");
        Ok(updated)
    }

    async fn delete_user(&self, id: &str) -> AppResult<()> {
        self.rules.check_id(id)?;
        self.repo.delete(id).await.context("delete user")?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
