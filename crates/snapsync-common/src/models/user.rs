//! User model: an application account mirrored from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A row in the `users` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    /// Identity-provider user ID; images reference users through it.
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// `GET /api/users` entry: the columns the Users table shows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: i32,
    pub clerk_id: String,
    pub name: String,
    pub email: String,
}

/// `POST /api/users`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(max = 128, message = "Clerk ID must be at most 128 characters"))]
    pub clerk_id: Option<String>,
}

/// `PUT /api/users`
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    pub id: Option<i32>,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

fn trim(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned())
}

impl CreateUserRequest {
    /// Strip surrounding whitespace so validation sees what will be stored.
    pub fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
            email: trim(self.email),
            clerk_id: trim(self.clerk_id),
        }
    }
}

impl UpdateUserRequest {
    /// Strip surrounding whitespace so validation sees what will be stored.
    pub fn trimmed(self) -> Self {
        Self {
            id: self.id,
            name: trim(self.name),
            email: trim(self.email),
        }
    }
}

/// `DELETE /api/users`
#[derive(Debug, Default, Deserialize)]
pub struct DeleteUserRequest {
    pub id: Option<i32>,
}
