use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{User, UserProfile};
use crate::error::DomainError;
use crate::policy::{self, Requester};
use crate::ports::{Page, PageRequest, PostRepository, UserRepository};

/// Read-only user directory. Every user is listed; the post references on
/// each profile are limited to what the requester may see.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    pub async fn list(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, DomainError> {
        let page = self.users.list(page).await?;

        let mut items = Vec::with_capacity(page.items.len());
        for user in page.items {
            items.push(self.profile(requester, user).await?);
        }

        Ok(Page {
            items,
            total: page.total,
        })
    }

    pub async fn get(&self, requester: &Requester, id: Uuid) -> Result<UserProfile, DomainError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "User",
                id,
            })?;

        self.profile(requester, user).await
    }

    async fn profile(&self, requester: &Requester, user: User) -> Result<UserProfile, DomainError> {
        let post_ids = self
            .posts
            .find_by_author_id(user.id, policy::visible_posts(requester))
            .await?
            .into_iter()
            .map(|p| p.id)
            .collect();

        Ok(UserProfile { user, post_ids })
    }
}
