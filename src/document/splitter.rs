use super::Document;

/// Splits each document into overlapping character windows.
///
/// Metadata is copied from the parent page and `chunk` numbers the windows
/// within that page. An overlap that is not smaller than the window is clamped.
pub fn split_documents(docs: &[Document], chunk_size: usize, overlap: usize) -> Vec<Document> {
    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size - 1);

    docs.iter()
        .flat_map(|doc| {
            chunk_text(&doc.page_content, chunk_size, overlap)
                .into_iter()
                .enumerate()
                .map(move |(i, text)| {
                    let mut metadata = doc.metadata.clone();
                    metadata.chunk = i;
                    Document {
                        page_content: text,
                        metadata,
                    }
                })
        })
        .collect()
}

fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return vec![];
    }

    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= chunk_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim().to_string();
        if !chunk.is_empty() {
            chunks.push(chunk);
        }
        if end >= chars.len() {
            break;
        }
        start += chunk_size - overlap;
    }

    chunks
}
