//! Post access policy.
//!
//! Every read and write path consults this module. Visibility is decided
//! first; ownership is only checked for posts the requester can already see,
//! so a hidden post always reads as "not found" and never as "forbidden".

use uuid::Uuid;

use crate::domain::Post;

/// The identity behind a request, or its absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    User(Uuid),
}

impl Requester {
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Requester::Anonymous => None,
            Requester::User(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Requester::User(_))
    }
}

impl From<Option<Uuid>> for Requester {
    fn from(user_id: Option<Uuid>) -> Self {
        user_id.map_or(Requester::Anonymous, Requester::User)
    }
}

/// The set of posts a requester may read, as a query scope.
///
/// Repositories translate this into their native filter; [`Visibility::admits`]
/// is the same rule evaluated against a single post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// `is_published = true`
    Published,
    /// `is_published = true OR author = <id>`
    PublishedOrAuthoredBy(Uuid),
}

impl Visibility {
    pub fn admits(&self, post: &Post) -> bool {
        match self {
            Visibility::Published => post.is_published,
            Visibility::PublishedOrAuthoredBy(author_id) => {
                post.is_published || post.author_id == *author_id
            }
        }
    }
}

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    NotFound,
    Forbidden,
}

/// Scope of posts visible to `requester`.
pub fn visible_posts(requester: &Requester) -> Visibility {
    match requester {
        Requester::Anonymous => Visibility::Published,
        Requester::User(id) => Visibility::PublishedOrAuthoredBy(*id),
    }
}

pub fn can_see(requester: &Requester, post: &Post) -> bool {
    visible_posts(requester).admits(post)
}

pub fn can_mutate(requester: &Requester, post: &Post) -> bool {
    match requester {
        Requester::Anonymous => false,
        Requester::User(id) => post.author_id == *id,
    }
}

/// Only authenticated requesters may create posts.
pub fn can_create(requester: &Requester) -> bool {
    requester.is_authenticated()
}

/// Gate an update or delete on `post` (`None` when no such post exists).
///
/// Anonymous writes are refused before the post is considered at all.
pub fn authorize_mutation(requester: &Requester, post: Option<&Post>) -> Result<(), Denial> {
    if !requester.is_authenticated() {
        return Err(Denial::Forbidden);
    }

    match post {
        None => Err(Denial::NotFound),
        Some(post) if !can_see(requester, post) => Err(Denial::NotFound),
        Some(post) if !can_mutate(requester, post) => Err(Denial::Forbidden),
        Some(_) => Ok(()),
    }
}
