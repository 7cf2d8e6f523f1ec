use crate::document::Document;
use crate::llm::embeddings::Embedder;
use log::info;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Cannot build an index from zero documents")]
    Empty,
    #[error("Embedding dimension mismatch: expected {expected}, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Got {vectors} embeddings for {documents} documents")]
    CountMismatch { documents: usize, vectors: usize },
    #[error(transparent)]
    Embedding(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

/// Flat in-memory index: every query is scored against every stored vector.
/// Lives only as long as the process that built it.
pub struct VectorStore {
    dimension: usize,
    entries: Vec<(Document, Vec<f32>)>,
}

impl VectorStore {
    pub async fn from_documents(
        docs: Vec<Document>,
        embedder: &dyn Embedder,
    ) -> Result<Self, IndexError> {
        if docs.is_empty() {
            return Err(IndexError::Empty);
        }

        let texts: Vec<String> = docs.iter().map(|d| d.page_content.clone()).collect();
        let vectors = embedder.embed_documents(&texts).await?;
        let store = Self::from_embeddings(docs, vectors)?;

        info!(
            "Indexed {} segments ({} dimensions)",
            store.len(),
            store.dimension
        );
        Ok(store)
    }

    pub fn from_embeddings(docs: Vec<Document>, vectors: Vec<Vec<f32>>) -> Result<Self, IndexError> {
        if docs.len() != vectors.len() {
            return Err(IndexError::CountMismatch {
                documents: docs.len(),
                vectors: vectors.len(),
            });
        }

        let dimension = vectors.first().map(Vec::len).ok_or(IndexError::Empty)?;
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(IndexError::DimensionMismatch {
                expected: dimension,
                found: bad.len(),
            });
        }

        Ok(Self {
            dimension,
            entries: docs.into_iter().zip(vectors).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Up to `k` documents, highest cosine similarity first. Equal scores keep
    /// insertion order.
    pub fn similarity_search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<ScoredDocument>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                found: query.len(),
            });
        }

        let mut scored: Vec<ScoredDocument> = self
            .entries
            .iter()
            .map(|(doc, emb)| ScoredDocument {
                document: doc.clone(),
                score: cosine_similarity(query, emb),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredDocument>, IndexError> {
        let query_embedding = embedder.embed_query(query).await?;
        self.similarity_search_by_vector(&query_embedding, k)
    }

    pub fn as_retriever(self: Arc<Self>, embedder: Arc<dyn Embedder>, k: usize) -> Retriever {
        Retriever {
            store: self,
            embedder,
            k,
        }
    }
}

/// Text in, ranked segments out.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    k: usize,
}

impl Retriever {
    pub async fn invoke(&self, query: &str) -> Result<Vec<Document>, IndexError> {
        let results = self
            .store
            .similarity_search(query, self.k, self.embedder.as_ref())
            .await?;
        Ok(results.into_iter().map(|r| r.document).collect())
    }
}

/// Cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Embeds text as keyword counts over a tiny fixed vocabulary.
    struct KeywordEmbedder;

    #[async_trait]
    impl Embedder for KeywordEmbedder {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            let vocab = ["battery", "solar", "wind"];
            Ok(texts
                .iter()
                .map(|t| {
                    let t = t.to_lowercase();
                    vocab.iter().map(|w| t.matches(w).count() as f32).collect()
                })
                .collect())
        }
    }

    fn docs() -> Vec<Document> {
        vec![
            Document::new("Wind turbines and more wind", "a.pdf", 0),
            Document::new("Battery chemistry", "a.pdf", 1),
            Document::new("Solar panels feed a battery", "a.pdf", 2),
        ]
    }

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let store = VectorStore::from_documents(docs(), &KeywordEmbedder)
            .await
            .unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.dimension(), 3);

        let results = store
            .similarity_search("battery", 2, &KeywordEmbedder)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.page_content, "Battery chemistry");
        assert_eq!(results[1].document.metadata.page, 2);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_retriever_returns_at_most_k() {
        let store = Arc::new(
            VectorStore::from_documents(docs(), &KeywordEmbedder)
                .await
                .unwrap(),
        );
        let retriever = store.as_retriever(Arc::new(KeywordEmbedder), 4);
        let results = retriever.invoke("wind").await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].metadata.page, 0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let docs = vec![
            Document::new("first", "a.pdf", 0),
            Document::new("second", "a.pdf", 1),
        ];
        let store = VectorStore::from_embeddings(docs, vec![vec![1.0, 0.0], vec![2.0, 0.0]]).unwrap();
        let results = store.similarity_search_by_vector(&[1.0, 0.0], 2).unwrap();
        assert_eq!(results[0].document.page_content, "first");
        assert_eq!(results[1].document.page_content, "second");
    }

    #[test]
    fn test_overflowing_norm_does_not_break_ranking() {
        let docs = vec![
            Document::new("huge", "a.pdf", 0),
            Document::new("close", "a.pdf", 1),
            Document::new("exact", "a.pdf", 2),
        ];
        let vectors = vec![vec![f32::MAX, f32::MAX], vec![0.5, 0.5], vec![1.0, 0.0]];
        let store = VectorStore::from_embeddings(docs, vectors).unwrap();

        let results = store.similarity_search_by_vector(&[1.0, 0.0], 3).unwrap();
        assert_eq!(results.len(), 3);
        let rank = |name: &str| {
            results
                .iter()
                .position(|r| r.document.page_content == name)
                .unwrap()
        };
        assert!(rank("exact") < rank("close"));
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        assert!(matches!(
            VectorStore::from_documents(vec![], &KeywordEmbedder).await,
            Err(IndexError::Empty)
        ));
    }

    #[test]
    fn test_dimension_checks() {
        let docs = vec![Document::new("a", "a.pdf", 0), Document::new("b", "a.pdf", 1)];
        assert!(matches!(
            VectorStore::from_embeddings(docs.clone(), vec![vec![1.0, 0.0], vec![1.0]]),
            Err(IndexError::DimensionMismatch { expected: 2, found: 1 })
        ));
        assert!(matches!(
            VectorStore::from_embeddings(docs.clone(), vec![vec![1.0]]),
            Err(IndexError::CountMismatch { documents: 2, vectors: 1 })
        ));

        let store = VectorStore::from_embeddings(docs, vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(store.similarity_search_by_vector(&[1.0, 0.0, 0.0], 1).is_err());
    }
}
