use super::Document;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PAGE_BREAK: char = '\u{c}';

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("PDF not found at: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No pages extracted from PDF.")]
    NoContent,
    #[error("Unsupported file type: .{0}")]
    Unsupported(String),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads a file into page-level documents.
///
/// PDFs go through `pdf-extract` one page at a time; plain text and markdown
/// files are read as a single page. Blank pages are dropped, and a file with
/// no remaining text is reported as [`LoaderError::NoContent`].
pub fn load(path: &Path) -> Result<Vec<Document>, LoaderError> {
    if !path.exists() {
        return Err(LoaderError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let source = path.display().to_string();
    let docs = match ext.as_str() {
        "pdf" => {
            let bytes = fs::read(path)?;
            let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
                .map_err(|e| LoaderError::Pdf(e.to_string()))?;
            documents_from_pages(pages, &source)?
        }
        "txt" | "md" | "markdown" => documents_from_text(&fs::read_to_string(path)?, &source)?,
        _ => return Err(LoaderError::Unsupported(ext)),
    };

    info!("Loaded {} page(s) from {}", docs.len(), source);
    Ok(docs)
}

/// One document per non-blank page, keeping the 0-based page index.
pub fn documents_from_pages<I, S>(pages: I, source: &str) -> Result<Vec<Document>, LoaderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let docs: Vec<Document> = pages
        .into_iter()
        .enumerate()
        .filter_map(|(page, content)| {
            let content = content.as_ref().trim();
            if content.is_empty() {
                debug!("Skipping blank page {} of {}", page, source);
                None
            } else {
                Some(Document::new(content, source, page))
            }
        })
        .collect();

    if docs.is_empty() {
        return Err(LoaderError::NoContent);
    }
    Ok(docs)
}

/// Plain text is one page unless it carries form feeds.
pub fn documents_from_text(text: &str, source: &str) -> Result<Vec<Document>, LoaderError> {
    documents_from_pages(text.split(PAGE_BREAK), source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load(Path::new("definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert_eq!(err.to_string(), "PDF not found at: definitely/not/here.pdf");
    }

    #[test]
    fn test_blank_text_is_no_content() {
        assert!(matches!(
            documents_from_text("", "a.pdf"),
            Err(LoaderError::NoContent)
        ));
        assert!(matches!(
            documents_from_text("  \n\u{c}\t\u{c} ", "a.pdf"),
            Err(LoaderError::NoContent)
        ));
    }

    #[test]
    fn test_pages_keep_their_index() {
        let docs = documents_from_text("Intro\u{c}\u{c}Body text\n", "a.pdf").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page_content, "Intro");
        assert_eq!(docs[0].metadata.page, 0);
        assert_eq!(docs[1].page_content, "Body text");
        assert_eq!(docs[1].metadata.page, 2);
    }

    #[test]
    fn test_empty_text_file_is_no_content() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "   ").unwrap();
        assert!(matches!(load(file.path()), Err(LoaderError::NoContent)));
    }

    #[test]
    fn test_text_file_loads_as_one_page() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# Title\n\nSome notes.").unwrap();
        let docs = load(file.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert!(docs[0].page_content.starts_with("# Title"));
    }

    #[test]
    fn test_blank_pages_are_skipped_but_numbered() {
        let pages = vec!["  ".to_string(), "Second".to_string(), "Third\n".to_string()];
        let docs = documents_from_pages(pages, "b.pdf").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.page, 1);
        assert_eq!(docs[1].page_content, "Third");
        assert_eq!(docs[1].metadata.page, 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        assert!(matches!(
            load(file.path()),
            Err(LoaderError::Unsupported(ext)) if ext == "docx"
        ));
    }
}
