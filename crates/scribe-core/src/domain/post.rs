use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::generate_slug;
use crate::error::ValidationErrors;

/// Longest title accepted for a post.
pub const TITLE_MAX_LEN: usize = 150;

/// Post entity - a blog post owned by its author.
///
/// `slug`, `author_id` and `created_at` are fixed at creation; only the
/// fields carried by [`PostChanges`] can change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, draft: NewPost) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: generate_slug(&draft.title),
            title: draft.title,
            content: draft.content,
            is_published: draft.is_published,
            created_at: Utc::now(),
        }
    }

    /// Apply already validated changes. The slug is never recomputed.
    pub fn apply(&mut self, changes: PostChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(is_published) = changes.is_published {
            self.is_published = is_published;
        }
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub is_published: bool,
}

impl NewPost {
    /// Build a draft from raw request fields, collecting every field error.
    pub fn parse(
        title: Option<String>,
        content: Option<String>,
        is_published: Option<bool>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(title.as_deref(), true, &mut errors);
        check_content(content.as_deref(), true, &mut errors);
        errors.into_result()?;

        Ok(Self {
            title: title.unwrap_or_default(),
            content: content.unwrap_or_default(),
            is_published: is_published.unwrap_or(false),
        })
    }
}

/// Requested changes to an existing post.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

impl PostChanges {
    /// Validate the changes. A full replacement (`partial == false`) must
    /// carry both title and content.
    pub fn validate(&self, partial: bool) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(self.title.as_deref(), !partial, &mut errors);
        check_content(self.content.as_deref(), !partial, &mut errors);
        errors.into_result()
    }
}

fn check_title(title: Option<&str>, required: bool, errors: &mut ValidationErrors) {
    match title {
        None if required => errors.add("title", "This field is required."),
        None => {}
        Some(t) if t.trim().is_empty() => errors.add("title", "This field may not be blank."),
        Some(t) if t.chars().count() > TITLE_MAX_LEN => errors.add(
            "title",
            format!("Ensure this field has no more than {TITLE_MAX_LEN} characters."),
        ),
        Some(_) => {}
    }
}

fn check_content(content: Option<&str>, required: bool, errors: &mut ValidationErrors) {
    match content {
        None if required => errors.add("content", "This field is required."),
        Some(c) if c.trim().is_empty() => errors.add("content", "This field may not be blank."),
        _ => {}
    }
}

/// A post paired with its author's username, as presented to clients.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: String,
}
