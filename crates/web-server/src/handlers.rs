use crate::{error::AppError, pdf, AppState};
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use core_types::Book;
use database::DbError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;

const BOOK_NOT_FOUND: &str = "Book not found";
const PDF_NOT_FOUND: &str = "PDF file not found";

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// # GET /api/v1/books/
/// Lists every book with its reviews nested. Always a JSON array.
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Book>>, AppError> {
    let books = state.db_repo.list_books_with_reviews().await?;
    tracing::debug!(count = books.len(), "Listed books.");
    Ok(Json(books))
}

/// # GET /api/v1/books/search?q=
/// Case-insensitive match on title, author or category. A blank query returns `[]`.
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Book>>, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(Vec::new()));
    }

    let books: Vec<Book> = state
        .db_repo
        .list_books_with_reviews()
        .await?
        .into_iter()
        .filter(|book| book.matches(&params.q))
        .collect();

    tracing::info!(query = %params.q, results = books.len(), "Search completed.");
    Ok(Json(books))
}

/// # GET /api/v1/books/:id/download
/// Streams the book's PDF as an attachment.
pub async fn download_pdf(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    request: Request,
) -> Result<Response, AppError> {
    let path = resolve_pdf_path(&state, &id).await?;
    tracing::info!(book_id = %id, path = %path.display(), "Downloading PDF.");

    let response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    match response.status() {
        // The file vanished between the existence check and the open.
        StatusCode::NOT_FOUND => return Err(AppError::NotFound(PDF_NOT_FOUND.to_string())),
        status if status.is_server_error() => {
            return Err(AppError::Internal(format!("Failed to read {}", path.display())));
        }
        _ => {}
    }

    let mut response = response.map(axum::body::Body::new);
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, content_disposition(&path));
    Ok(response)
}

/// # GET /api/v1/books/:id/page-count
pub async fn page_count(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let path = resolve_pdf_path(&state, &id).await?;

    let total_pages = tokio::task::spawn_blocking(move || pdf::page_count(&path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Pdf(e.to_string()))?;

    tracing::info!(book_id = %id, total_pages, "Counted PDF pages.");
    Ok(Json(json!({ "total_pages": total_pages })))
}

/// Any route not registered above.
pub async fn fallback() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Maps a book id to a PDF that exists on disk, or to the matching 404.
async fn resolve_pdf_path(state: &AppState, id: &str) -> Result<PathBuf, AppError> {
    let stored = match state.db_repo.get_pdf_path(id).await {
        Ok(stored) => stored,
        Err(DbError::NotFound) => return Err(AppError::NotFound(BOOK_NOT_FOUND.to_string())),
        Err(e) => return Err(e.into()),
    };

    let Some(path) = stored.map(PathBuf::from) else {
        return Err(AppError::NotFound(PDF_NOT_FOUND.to_string()));
    };

    // A directory cannot be served as a download, so it counts as missing.
    match tokio::fs::metadata(&path).await {
        Ok(meta) if !meta.is_file() => Err(AppError::NotFound(PDF_NOT_FOUND.to_string())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound(PDF_NOT_FOUND.to_string()))
        }
        _ => Ok(path),
    }
}

fn content_disposition(path: &std::path::Path) -> HeaderValue {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().replace('"', ""))
        .unwrap_or_default();

    HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
