use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthoredPost, NewPost, Post, PostChanges};
use crate::error::{DomainError, RepoError};
use crate::policy::{self, Denial, Requester};
use crate::ports::{Page, PageRequest, PostRepository, UserRepository};

const ENTITY: &str = "Post";

/// Post use cases. Every path goes through [`crate::policy`] before touching
/// the store.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    /// Posts visible to `requester`, oldest first.
    pub async fn list(
        &self,
        requester: &Requester,
        page: PageRequest,
    ) -> Result<Page<AuthoredPost>, DomainError> {
        let scope = policy::visible_posts(requester);
        let page = self.posts.list_visible(scope, page).await?;
        let total = page.total;
        let items = self.with_authors(page.items).await?;

        Ok(Page { items, total })
    }

    /// A single post; hidden posts are reported as not found.
    pub async fn get(&self, requester: &Requester, id: Uuid) -> Result<AuthoredPost, DomainError> {
        let scope = policy::visible_posts(requester);
        let post = self
            .posts
            .find_visible(id, scope)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            })?;

        self.with_author(post).await
    }

    /// Create a post owned by the requester. Any author supplied by the
    /// client never reaches this point.
    pub async fn create(
        &self,
        requester: &Requester,
        input: PostChanges,
    ) -> Result<AuthoredPost, DomainError> {
        if !policy::can_create(requester) {
            return Err(DomainError::Forbidden);
        }
        let author_id = requester.user_id().ok_or(DomainError::Forbidden)?;

        let draft = NewPost::parse(input.title, input.content, input.is_published)?;
        let post = self.posts.insert(Post::new(author_id, draft)).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, slug = %post.slug, "Post created");

        self.with_author(post).await
    }

    /// Update a post. `partial` distinguishes PATCH from a full replacement.
    pub async fn update(
        &self,
        requester: &Requester,
        id: Uuid,
        changes: PostChanges,
        partial: bool,
    ) -> Result<AuthoredPost, DomainError> {
        let post = self.authorized_for_mutation(requester, id).await?;
        self.apply_changes(post, changes, partial).await
    }

    /// Validate and store `changes` on a post already returned by
    /// [`Self::authorized_for_mutation`].
    pub async fn apply_changes(
        &self,
        mut post: Post,
        changes: PostChanges,
        partial: bool,
    ) -> Result<AuthoredPost, DomainError> {
        changes.validate(partial)?;
        post.apply(changes);

        let id = post.id;
        let post = self
            .posts
            .update(post)
            .await
            .map_err(|e| vanished(e, id))?;

        tracing::info!(post_id = %post.id, "Post updated");

        self.with_author(post).await
    }

    pub async fn delete(&self, requester: &Requester, id: Uuid) -> Result<(), DomainError> {
        let post = self.authorized_for_mutation(requester, id).await?;
        self.posts
            .delete(post.id)
            .await
            .map_err(|e| vanished(e, id))?;

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// The post `id`, provided `requester` may change it.
    ///
    /// Anonymous requesters are refused without a lookup, so this can run
    /// before the request body is even parsed.
    pub async fn authorized_for_mutation(
        &self,
        requester: &Requester,
        id: Uuid,
    ) -> Result<Post, DomainError> {
        let post = if requester.is_authenticated() {
            self.posts.find_by_id(id).await?
        } else {
            None
        };

        match policy::authorize_mutation(requester, post.as_ref()) {
            Ok(()) => post.ok_or(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            }),
            Err(Denial::NotFound) => Err(DomainError::NotFound {
                entity_type: ENTITY,
                id,
            }),
            Err(Denial::Forbidden) => {
                tracing::warn!(post_id = %id, requester = ?requester, "Post mutation denied");
                Err(DomainError::Forbidden)
            }
        }
    }

    async fn with_author(&self, post: Post) -> Result<AuthoredPost, DomainError> {
        let mut authored = self.with_authors(vec![post]).await?;
        authored
            .pop()
            .ok_or_else(|| DomainError::Internal("post lost while resolving author".to_string()))
    }

    async fn with_authors(&self, posts: Vec<Post>) -> Result<Vec<AuthoredPost>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let usernames: HashMap<Uuid, String> = self
            .users
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.username))
            .collect();

        posts
            .into_iter()
            .map(|post| {
                let author = usernames.get(&post.author_id).cloned().ok_or_else(|| {
                    DomainError::Internal(format!("author {} of post {} missing", post.author_id, post.id))
                })?;
                Ok(AuthoredPost { post, author })
            })
            .collect()
    }
}

/// A post removed between authorization and the write is simply gone.
fn vanished(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::NotFound {
            entity_type: ENTITY,
            id,
        },
        other => other.into(),
    }
}
