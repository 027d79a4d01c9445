use lopdf::Document;
use std::path::Path;

/// Counts the pages of the PDF at `path`.
pub fn page_count(path: &Path) -> Result<usize, lopdf::Error> {
    let doc = Document::load(path)?;
    Ok(doc.get_pages().len())
}
