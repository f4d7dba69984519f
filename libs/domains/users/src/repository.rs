use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::UserResult;
use crate::models::{UserDocument, UserFields};

/// Repository trait for User persistence
///
/// Ids arrive already parsed; translating external ids is the service's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every stored user, in store order
    async fn find_all(&self) -> UserResult<Vec<UserDocument>>;

    /// Get a user by ID
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>>;

    /// Store a new user and return the generated id
    async fn insert(&self, fields: UserFields) -> UserResult<ObjectId>;

    /// Overwrite the fields of an existing user. Returns false if no user matched.
    async fn update(&self, id: ObjectId, fields: UserFields) -> UserResult<bool>;

    /// Delete a user by ID. Returns false if no user matched.
    async fn delete(&self, id: ObjectId) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Enumerates users in insertion order.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<UserDocument>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> UserResult<Vec<UserDocument>> {
        let users = self.users.read().await;
        Ok(users.clone())
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, fields: UserFields) -> UserResult<ObjectId> {
        let mut users = self.users.write().await;

        let id = ObjectId::new();
        users.push(UserDocument {
            id,
            name: fields.name,
            email: fields.email,
            password: fields.password,
        });

        tracing::info!(user_id = %id, "Created user");
        Ok(id)
    }

    async fn update(&self, id: ObjectId, fields: UserFields) -> UserResult<bool> {
        let mut users = self.users.write().await;

        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(false);
        };

        user.name = fields.name;
        user.email = fields.email;
        user.password = fields.password;

        tracing::info!(user_id = %id, "Updated user");
        Ok(true)
    }

    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let mut users = self.users.write().await;

        let before = users.len();
        users.retain(|u| u.id != id);
        let deleted = users.len() < before;

        if deleted {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> UserFields {
        UserFields {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password: "secret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let repo = InMemoryUserRepository::new();

        let id = repo.insert(fields("Ada")).await.unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.name, "Ada");
        assert!(repo.find_by_id(ObjectId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_all().await.unwrap().is_empty());

        for name in ["Ada", "Grace", "Linus"] {
            repo.insert(fields(name)).await.unwrap();
        }

        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, ["Ada", "Grace", "Linus"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert(fields("Ada")).await.unwrap();

        assert!(repo.update(id, fields("Grace")).await.unwrap());
        assert!(!repo.update(ObjectId::new(), fields("Linus")).await.unwrap());

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.name, "Grace");
        assert_eq!(found.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert(fields("Ada")).await.unwrap();

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert!(repo.find_all().await.unwrap().is_empty());
    }
}
