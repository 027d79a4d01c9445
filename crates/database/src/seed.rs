use crate::error::DbError;
use sqlx::sqlite::SqlitePool;

/// What `seed_sample_data` did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already held books; nothing was written.
    AlreadyPopulated,
    /// The demonstration book and its review were inserted.
    Seeded { book_id: i64 },
}

/// Inserts one demonstration book and one review, but only into an empty store.
///
/// Both inserts share a transaction. If either fails the transaction is
/// dropped without committing, which rolls it back.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<SeedOutcome, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        tracing::info!(books = count, "Sample data already exists, skipping seed.");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let mut tx = pool.begin().await?;

    let book_id = sqlx::query(
        r#"
        INSERT INTO books (
            title, author, category, description, cover_image,
            publication_year, isbn, pdf_path
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind("The Sealed Nectar")
    .bind("Safiur Rahman Mubarakpuri")
    .bind("Biography")
    .bind("Biography of Prophet Muhammad (peace be upon him)")
    .bind("https://example.com/cover1.jpg")
    .bind(1979_i64)
    .bind("978-9960-899-55-8")
    .bind("./pdfs/sealed-nectar.pdf")
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    sqlx::query("INSERT INTO reviews (book_id, text, author) VALUES (?, ?, ?)")
        .bind(book_id)
        .bind("An excellent biography that provides detailed insights.")
        .bind("Abdullah")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(book_id, "Inserted sample data.");
    Ok(SeedOutcome::Seeded { book_id })
}
