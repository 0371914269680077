//! URL slug generation for posts.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

const BASE_MAX_LEN: usize = 65;
const SUFFIX_LEN: usize = 8;

/// Reduce text to a lowercase, URL-safe token.
///
/// The text is NFKD-normalized first, so accented letters keep their base
/// letter (`é` becomes `e`). ASCII letters, digits and underscores are then
/// kept, runs of whitespace and hyphens become a single hyphen, and anything
/// else (including letters with no ASCII decomposition) is dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.nfkd() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug for a new post: slugified title (or `post`) plus a random hex suffix,
/// so duplicate titles still get distinct slugs.
pub fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let base = if base.is_empty() { "post" } else { base.as_str() };
    // slugify output is ASCII, byte slicing is safe
    let base = &base[..base.len().min(BASE_MAX_LEN)];
    let suffix = Uuid::new_v4().simple().to_string();

    format!("{}-{}", base, &suffix[..SUFFIX_LEN])
}
