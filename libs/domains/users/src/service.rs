//! User Service - Business logic layer

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserForm, parse_user_id};
use crate::repository::UserRepository;
use crate::validation::validate_form;

/// User service providing the CRUD operations
///
/// Ids are checked in two steps: a malformed id is rejected without touching
/// the store, then the store must hold a user with that id.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List all users
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        let users = self.repository.find_all().await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &str) -> UserResult<User> {
        let id = parse_user_id(user_id)?;
        self.repository
            .find_by_id(id)
            .await?
            .map(User::from)
            .ok_or_else(|| UserError::NotFound(user_id.to_string()))
    }

    /// Create a user from a form
    #[instrument(skip(self, form))]
    pub async fn create_user(&self, form: UserForm) -> UserResult<User> {
        let fields = validate_form(&form)?;

        let id = self.repository.insert(fields.clone()).await?;

        Ok(User::new(id.to_hex(), fields))
    }

    /// Replace the fields of an existing user
    ///
    /// The result is built from `user_id` and the submitted values; the store
    /// is not read back.
    #[instrument(skip(self, form))]
    pub async fn update_user(&self, user_id: &str, form: UserForm) -> UserResult<User> {
        let id = self.ensure_exists(user_id).await?;
        let fields = validate_form(&form)?;

        // The user may have been deleted since the existence check.
        if !self.repository.update(id, fields.clone()).await? {
            return Err(UserError::NotFound(user_id.to_string()));
        }

        Ok(User::new(user_id, fields))
    }

    /// Delete a user
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str) -> UserResult<()> {
        let id = self.ensure_exists(user_id).await?;

        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(user_id.to_string()));
        }

        Ok(())
    }

    /// Resolve `user_id` to the id of a stored user, or `NotFound`
    #[instrument(skip(self))]
    pub async fn ensure_exists(&self, user_id: &str) -> UserResult<ObjectId> {
        let id = parse_user_id(user_id)?;
        match self.repository.find_by_id(id).await? {
            Some(_) => Ok(id),
            None => Err(UserError::NotFound(user_id.to_string())),
        }
    }
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
