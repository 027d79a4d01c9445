use crate::DbError;
use core_types::{Book, Review};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the database. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: SqlitePool,
}

// A review as stored; `book_id` comes from the parent book instead.
#[derive(FromRow)]
struct ReviewRow {
    id: i64,
    text: String,
    author: String,
}

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Lists every book in insertion order, each with its reviews attached.
    ///
    /// Decoding is best-effort. A book row that does not decode is skipped, and
    /// a book whose reviews cannot be fetched is returned with no reviews. Only
    /// a failure of the books query itself is reported to the caller.
    pub async fn list_books_with_reviews(&self) -> Result<Vec<Book>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, author, category, description,
                   cover_image, publication_year, isbn, pdf_path
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut books = Vec::with_capacity(rows.len());
        for row in rows {
            let mut book = match Book::from_row(&row) {
                Ok(book) => book,
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping book row that failed to decode.");
                    continue;
                }
            };

            book.reviews = match self.get_reviews_for_book(book.id).await {
                Ok(reviews) => reviews,
                Err(e) => {
                    tracing::debug!(book_id = book.id, error = %e, "Could not load reviews.");
                    Vec::new()
                }
            };
            books.push(book);
        }

        Ok(books)
    }

    /// Fetches the reviews of a single book, stamped with that book's id.
    pub async fn get_reviews_for_book(&self, book_id: i64) -> Result<Vec<Review>, DbError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, text, author FROM reviews WHERE book_id = ? ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        let reviews = rows
            .into_iter()
            .map(|row| Review {
                id: row.id,
                book_id,
                text: row.text,
                author: row.author,
            })
            .collect();

        Ok(reviews)
    }

    /// Looks up the stored PDF path of a book.
    ///
    /// `id` is bound exactly as received; SQLite's integer affinity on `books.id`
    /// converts numeric text, and anything else matches no row. Returns
    /// `DbError::NotFound` when no book matches and `Ok(None)` when the book
    /// has no path recorded.
    pub async fn get_pdf_path(&self, id: &str) -> Result<Option<String>, DbError> {
        let pdf_path = sqlx::query_scalar::<_, Option<String>>("SELECT pdf_path FROM books WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| if let sqlx::Error::RowNotFound = e { DbError::NotFound } else { e.into() })?;

        Ok(pdf_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{connect, run_migrations};
    use tempfile::TempDir;

    async fn repo_with_schema(dir: &TempDir) -> (DbRepository, SqlitePool) {
        let pool = connect(dir.path().join("books.db")).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (DbRepository::new(pool.clone()), pool)
    }

    async fn insert_book(pool: &SqlitePool, title: &str, pdf_path: Option<&str>) -> i64 {
        sqlx::query("INSERT INTO books (title, author, category, pdf_path) VALUES (?, 'Author', 'Category', ?)")
            .bind(title)
            .bind(pdf_path)
            .execute(pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    async fn insert_review(pool: &SqlitePool, book_id: i64, author: &str) {
        sqlx::query("INSERT INTO reviews (book_id, text, author) VALUES (?, 'Worth reading.', ?)")
            .bind(book_id)
            .bind(author)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_store_lists_no_books() {
        let dir = TempDir::new().unwrap();
        let (repo, _pool) = repo_with_schema(&dir).await;

        let books = repo.list_books_with_reviews().await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn books_come_back_in_insertion_order_with_their_own_reviews() {
        let dir = TempDir::new().unwrap();
        let (repo, pool) = repo_with_schema(&dir).await;
        let first = insert_book(&pool, "First", None).await;
        let second = insert_book(&pool, "Second", None).await;
        insert_review(&pool, second, "Maryam").await;
        insert_review(&pool, second, "Yusuf").await;

        let books = repo.list_books_with_reviews().await.unwrap();

        assert_eq!(books.iter().map(|b| b.id).collect::<Vec<_>>(), vec![first, second]);
        assert!(books[0].reviews.is_empty());
        let authors: Vec<_> = books[1].reviews.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["Maryam", "Yusuf"]);
        assert!(books[1].reviews.iter().all(|r| r.book_id == second));
    }

    #[tokio::test]
    async fn rows_that_fail_to_decode_are_skipped() {
        let dir = TempDir::new().unwrap();
        let (repo, pool) = repo_with_schema(&dir).await;
        insert_book(&pool, "Readable", None).await;
        // SQLite keeps non-numeric text in an INTEGER column as TEXT.
        sqlx::query("INSERT INTO books (title, author, category, publication_year) VALUES ('Broken', 'A', 'C', 'not-a-year')")
            .execute(&pool)
            .await
            .unwrap();

        let books = repo.list_books_with_reviews().await.unwrap();

        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Readable");
    }

    #[tokio::test]
    async fn undecodable_reviews_leave_the_book_with_none() {
        let dir = TempDir::new().unwrap();
        let (repo, pool) = repo_with_schema(&dir).await;
        let id = insert_book(&pool, "Book", None).await;
        sqlx::query("INSERT INTO reviews (book_id, text, author) VALUES (?, X'DEADBEEF', 'Hafsa')")
            .bind(id)
            .execute(&pool)
            .await
            .unwrap();

        let books = repo.list_books_with_reviews().await.unwrap();

        assert_eq!(books.len(), 1);
        assert!(books[0].reviews.is_empty());
    }

    #[tokio::test]
    async fn pdf_path_lookup() {
        let dir = TempDir::new().unwrap();
        let (repo, pool) = repo_with_schema(&dir).await;
        let with_path = insert_book(&pool, "With", Some("./pdfs/with.pdf")).await;
        let without_path = insert_book(&pool, "Without", None).await;

        assert_eq!(
            repo.get_pdf_path(&with_path.to_string()).await.unwrap().as_deref(),
            Some("./pdfs/with.pdf")
        );
        assert_eq!(repo.get_pdf_path(&without_path.to_string()).await.unwrap(), None);
        assert!(matches!(repo.get_pdf_path("999").await, Err(DbError::NotFound)));
        assert!(matches!(repo.get_pdf_path("abc").await, Err(DbError::NotFound)));
    }
}
