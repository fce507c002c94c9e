//! API response model for users.

use serde::Serialize;
use utoipa::ToSchema;

use crate::{db::models::users::UserDBResponse, types::UserId};

/// Public view of a user. The password hash never leaves the store layer.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.name,
        }
    }
}
