use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single title in the library catalog, as stored in the `books` table.
///
/// `reviews` is not a column: the query layer fills it after the row is
/// decoded, and it always serializes as an array (possibly empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub publication_year: Option<i64>,
    pub isbn: Option<String>,
    pub pdf_path: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// A free-text comment attached to exactly one `Book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub text: String,
    pub author: String,
}

impl Book {
    /// Case-insensitive substring match over title, author and category.
    ///
    /// A blank query matches nothing.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        [&self.title, &self.author, &self.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}
