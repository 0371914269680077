//! Domain entities - the core business objects.

mod post;
mod slug;
mod user;

pub use post::{AuthoredPost, NewPost, Post, PostChanges, TITLE_MAX_LEN};
pub use slug::{generate_slug, slugify};
pub use user::{User, UserProfile, USERNAME_MAX_LEN};
