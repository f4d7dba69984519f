//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{UserDocument, UserFields};
use crate::repository::UserRepository;

/// Collection used by [`MongoUserRepository::new`]
pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Repository over the `users` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(client.database("users_db"));
    /// ```
    pub fn new(db: Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    /// Create a new MongoUserRepository with a custom collection name
    pub fn with_collection(db: Database, collection_name: &str) -> Self {
        let collection = db.collection::<UserDocument>(collection_name);
        Self { collection }
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<UserDocument> {
        &self.collection
    }

    fn id_filter(id: ObjectId) -> Document {
        doc! { "_id": id }
    }

    fn set_fields(fields: &UserFields) -> Document {
        doc! {
            "$set": {
                "name": fields.name.as_str(),
                "email": fields.email.as_str(),
                "password": fields.password.as_str(),
            }
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<UserDocument>> {
        let cursor = self.collection.find(doc! {}).await?;
        let users: Vec<UserDocument> = cursor.try_collect().await?;
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>> {
        let user = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(user)
    }

    #[instrument(skip(self, fields))]
    async fn insert(&self, fields: UserFields) -> UserResult<ObjectId> {
        // The driver generates `_id`, so the insert goes through an id-less view.
        let result = self
            .collection
            .clone_with_type::<UserFields>()
            .insert_one(&fields)
            .await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            UserError::Internal(format!(
                "Inserted id is not an ObjectId: {}",
                result.inserted_id
            ))
        })?;

        tracing::info!(user_id = %id, "User created successfully");
        Ok(id)
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, id: ObjectId, fields: UserFields) -> UserResult<bool> {
        let result = self
            .collection
            .update_one(Self::id_filter(id), Self::set_fields(&fields))
            .await?;

        if result.matched_count > 0 {
            tracing::info!(user_id = %id, "User updated successfully");
        }
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_filter() {
        let id = ObjectId::new();
        let filter = MongoUserRepository::id_filter(id);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
    }

    #[test]
    fn test_set_fields_covers_all_mutable_fields() {
        let update = MongoUserRepository::set_fields(&UserFields {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "secret".into(),
        });

        let set = update.get_document("$set").unwrap();
        assert_eq!(set.get_str("name").unwrap(), "Ada");
        assert_eq!(set.get_str("email").unwrap(), "ada@example.com");
        assert_eq!(set.get_str("password").unwrap(), "secret");
        assert!(!set.contains_key("_id"));
    }
}
