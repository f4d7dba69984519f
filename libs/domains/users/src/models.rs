use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{UserError, UserResult};

/// User as stored in the `users` collection
///
/// String fields missing from a stored document decode as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Store-assigned id (24-character hex ObjectId)
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Returned as stored
    #[schema(example = "analytical-engine")]
    pub password: String,
}

impl User {
    /// Build the response shape from an id and the fields that were written
    pub fn new(id: impl Into<String>, fields: UserFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            email: fields.email,
            password: fields.password,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            password: doc.password,
        }
    }
}

/// Urlencoded body for create and update
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserForm {
    /// The name of the user
    pub name: String,
    /// The email address of the user
    pub email: String,
    /// The password of the user
    pub password: String,
}

/// Validated, trimmed values written to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<&UserForm> for UserFields {
    fn from(form: &UserForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            password: form.password.trim().to_string(),
        }
    }
}

/// Translate an external id into an ObjectId.
///
/// Anything that is not 24 hex characters is reported as a missing user.
pub fn parse_user_id(user_id: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(user_id).map_err(|_| UserError::NotFound(user_id.to_string()))
}
