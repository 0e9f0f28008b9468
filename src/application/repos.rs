//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{ItemRecord, UserRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("integrity error: {message}")]
    Integrity { message: String },
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewUserParams {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewItemParams {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct UpdateItemParams {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    /// Insert a new user. Duplicate email surfaces as [`RepoError::Duplicate`].
    async fn create_user(&self, params: NewUserParams) -> Result<UserRecord, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;
}

#[async_trait]
pub trait ItemsRepo: Send + Sync {
    /// Insert a new item. Duplicate name surfaces as [`RepoError::Duplicate`].
    async fn create_item(&self, params: NewItemParams) -> Result<ItemRecord, RepoError>;

    async fn find_item(&self, id: i64) -> Result<Option<ItemRecord>, RepoError>;

    /// Replace name and description of an existing item.
    async fn update_item(&self, params: UpdateItemParams) -> Result<ItemRecord, RepoError>;

    async fn delete_item(&self, id: i64) -> Result<(), RepoError>;

    /// All items; ordering is not part of the contract.
    async fn list_items(&self) -> Result<Vec<ItemRecord>, RepoError>;
}
