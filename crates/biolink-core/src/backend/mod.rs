//! Persistence collaborator contract
//!
//! The dashboard core delegates all storage to a record backend exposing
//! narrow select/insert/update/delete operations over two entities:
//! `users` (one row per profile) and `links` (one row per link, keyed to
//! its user). Implementations:
//!
//! - [`SqliteBackend`]: local SQLite database
//! - [`MemoryBackend`]: in-memory, with call recording and failure
//!   injection for tests

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{LinkField, LinkItem, NewLink, NewProfile, ProfileField, UserProfile};

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::{BackendCall, MemoryBackend};
pub use sqlite::SqliteBackend;

/// Errors from the record backend
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached or refused the operation
    #[error("Backend unavailable: {reason}")]
    Unavailable { reason: String },

    /// A uniqueness constraint was violated
    #[error("Value for '{field}' is already taken")]
    Conflict { field: &'static str },

    /// The addressed record does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl BackendError {
    /// Whether this error is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, BackendError::Conflict { .. })
    }
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Record backend for profiles and their links
///
/// Every mutation is field- or record-scoped; there are no batch writes.
/// `load_profile` and `find_profile_by_username` return the profile row
/// only — the link sequence is loaded separately via `load_links`.
#[async_trait]
pub trait RecordBackend: Send + Sync {
    /// Create a profile row, returning it with the generated id
    async fn create_profile(&self, profile: &NewProfile) -> BackendResult<UserProfile>;

    /// Fetch a profile row by id
    async fn load_profile(&self, user_id: Uuid) -> BackendResult<UserProfile>;

    /// Fetch a profile row by public username
    async fn find_profile_by_username(&self, username: &str)
        -> BackendResult<Option<UserProfile>>;

    /// Fetch all links for a user, ordered by position ascending
    async fn load_links(&self, user_id: Uuid) -> BackendResult<Vec<LinkItem>>;

    /// Insert a link row, returning it with the generated id
    async fn insert_link(&self, user_id: Uuid, link: &NewLink) -> BackendResult<LinkItem>;

    /// Update a single field of a link row
    async fn update_link_field(&self, id: Uuid, field: &LinkField) -> BackendResult<()>;

    /// Delete a link row
    async fn delete_link(&self, id: Uuid) -> BackendResult<()>;

    /// Update a single field of a profile row
    async fn update_profile_field(
        &self,
        user_id: Uuid,
        field: &ProfileField,
    ) -> BackendResult<()>;

    /// Update a profile's username (unique across users)
    async fn update_username(&self, user_id: Uuid, username: &str) -> BackendResult<()>;

    /// Existence check used for username availability
    async fn username_exists(&self, username: &str) -> BackendResult<bool>;
}
