use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Post, User};
use crate::error::RepoError;
use crate::policy::Visibility;

/// A 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.size
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Users ordered by creation time.
    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepoError>;

    /// Fetch several users at once. Unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Post repository. Read methods take the requester's [`Visibility`] scope.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Posts within `visibility`, ordered by creation time.
    async fn list_visible(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError>;

    /// A single post, only if it lies within `visibility`.
    async fn find_visible(&self, id: Uuid, visibility: Visibility)
    -> Result<Option<Post>, RepoError>;

    /// Posts written by `author_id` that lie within `visibility`.
    async fn find_by_author_id(
        &self,
        author_id: Uuid,
        visibility: Visibility,
    ) -> Result<Vec<Post>, RepoError>;
}
