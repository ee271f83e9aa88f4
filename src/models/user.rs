//! User accounts

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::PasswordHash;
use crate::store::ObjectId;

/// A registered user as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Login name; exact, case-sensitive match
    #[serde(rename = "username")]
    pub email: String,

    /// Only ever a hash
    pub password: PasswordHash,

    #[serde(rename = "isadmin", default)]
    pub is_admin: bool,
}

impl User {
    pub fn new(email: String, password: PasswordHash, is_admin: bool) -> Self {
        Self {
            id: None,
            email,
            password,
            is_admin,
        }
    }

    /// Identifier of this user, minting one if it has none yet
    pub fn assign_id(&mut self) -> ObjectId {
        *self.id.get_or_insert_with(ObjectId::new)
    }

    /// Response form, without the password
    pub fn view(&self) -> UserView {
        UserView {
            username: self.email.clone(),
            isadmin: self.is_admin,
        }
    }
}

/// A user as echoed in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub username: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub isadmin: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Registration and login body
#[derive(Clone, Default, Deserialize, Validate)]
pub struct UserPayload {
    #[validate(required, email)]
    pub username: Option<String>,

    #[validate(required, length(min = 8, max = 300, code = "min_max_length"))]
    pub password: Option<String>,

    pub isadmin: Option<bool>,
}

impl UserPayload {
    /// Split into email and plaintext password. Call only after validation.
    pub fn into_parts(self) -> (String, String, bool) {
        (
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
            self.isadmin.unwrap_or_default(),
        )
    }
}

impl fmt::Debug for UserPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPayload")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("isadmin", &self.isadmin)
            .finish()
    }
}
