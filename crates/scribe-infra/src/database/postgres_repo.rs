//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use scribe_core::domain::{Post, User};
use scribe_core::error::RepoError;
use scribe_core::policy::Visibility;
use scribe_core::ports::{Page, PageRequest, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// SQL rendering of a visibility scope.
pub(crate) fn visibility_condition(visibility: Visibility) -> Condition {
    match visibility {
        Visibility::Published => Condition::all().add(post::Column::IsPublished.eq(true)),
        Visibility::PublishedOrAuthoredBy(author_id) => Condition::any()
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::AuthorId.eq(author_id)),
    }
}

/// Visible posts, oldest first.
pub(crate) fn visible_posts_query(visibility: Visibility) -> Select<PostEntity> {
    PostEntity::find()
        .filter(visibility_condition(visibility))
        .order_by_asc(post::Column::CreatedAt)
        .order_by_asc(post::Column::Id)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<User>, RepoError> {
        let query = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id);

        let total = query.clone().count(&self.db).await.map_err(repo_err)?;
        let items = query
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_visible(
        &self,
        visibility: Visibility,
        page: PageRequest,
    ) -> Result<Page<Post>, RepoError> {
        tracing::debug!(?visibility, page = page.number, "Listing visible posts");

        let query = visible_posts_query(visibility);
        let total = query.clone().count(&self.db).await.map_err(repo_err)?;
        let items = query
            .offset(page.offset())
            .limit(page.size)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(Page {
            items: items.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn find_visible(
        &self,
        id: Uuid,
        visibility: Visibility,
    ) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .filter(visibility_condition(visibility))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_author_id(
        &self,
        author_id: Uuid,
        visibility: Visibility,
    ) -> Result<Vec<Post>, RepoError> {
        let result = visible_posts_query(visibility)
            .filter(post::Column::AuthorId.eq(author_id))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
