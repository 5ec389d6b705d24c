//! Mock data gateway.
//!
//! Answers the same request surface a remote API would, from the bundled
//! content store, after a randomized latency.

use std::sync::Arc;

use tracing::debug;

use crate::config::Latency;
use crate::models::{Category, KanaQuestion, SentenceQuestion, WordPicQuestion};

use super::{ContentStore, FetchError};

pub const CATEGORIES_PATH: &str = "/categories";
pub const KANA_PATH: &str = "/kana";
pub const WORD_PIC_PATH: &str = "/word-pic";
pub const QUIZ_PATH: &str = "/quiz";
pub const CATEGORY_ID_PARAM: &str = "categoryId";

/// A collection returned by the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Categories(Vec<Category>),
    Kana(Vec<KanaQuestion>),
    WordPics(Vec<WordPicQuestion>),
    Sentences(Vec<SentenceQuestion>),
}

impl Payload {
    pub fn len(&self) -> usize {
        match self {
            Payload::Categories(items) => items.len(),
            Payload::Kana(items) => items.len(),
            Payload::WordPics(items) => items.len(),
            Payload::Sentences(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MockGateway {
    store: Arc<ContentStore>,
    latency: Latency,
}

impl MockGateway {
    pub fn new(store: Arc<ContentStore>, latency: Latency) -> Self {
        Self { store, latency }
    }

    /// Resolve `path` after the simulated network delay.
    ///
    /// `path` may carry its own query string (`/quiz?categoryId=cafe`);
    /// entries in `query` take precedence over it.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Payload, FetchError> {
        let delay = self.latency.sample(&mut rand::rng());
        debug!(path, ?delay, "mock request");
        tokio::time::sleep(delay).await;

        let (route, inline_query) = path.split_once('?').unwrap_or((path, ""));

        match route {
            CATEGORIES_PATH => Ok(Payload::Categories(self.store.categories.clone())),
            KANA_PATH => Ok(Payload::Kana(self.store.kana.clone())),
            WORD_PIC_PATH => Ok(Payload::WordPics(self.store.word_pics.clone())),
            QUIZ_PATH => {
                let category_id = query_param(query, inline_query, CATEGORY_ID_PARAM);
                Ok(Payload::Sentences(self.sentences_for(category_id)))
            }
            _ => Err(FetchError::NotFound(path.to_string())),
        }
    }

    fn sentences_for(&self, category_id: Option<&str>) -> Vec<SentenceQuestion> {
        match category_id {
            Some(id) => self
                .store
                .sentences
                .iter()
                .filter(|q| q.category_id == id)
                .cloned()
                .collect(),
            None => self.store.sentences.clone(),
        }
    }
}

fn query_param<'a>(query: &[(&str, &'a str)], inline: &'a str, key: &str) -> Option<&'a str> {
    query
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .or_else(|| {
            inline
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn gateway(latency: Latency) -> MockGateway {
        MockGateway::new(Arc::new(ContentStore::bundled().unwrap()), latency)
    }

    #[tokio::test]
    async fn test_known_paths() {
        let gateway = gateway(Latency::none());
        assert!(matches!(
            gateway.get(CATEGORIES_PATH, &[]).await.unwrap(),
            Payload::Categories(_)
        ));
        assert!(matches!(gateway.get(KANA_PATH, &[]).await.unwrap(), Payload::Kana(_)));
        assert!(matches!(
            gateway.get(WORD_PIC_PATH, &[]).await.unwrap(),
            Payload::WordPics(_)
        ));
    }

    #[tokio::test]
    async fn test_quiz_filters_by_exact_category() {
        let gateway = gateway(Latency::none());

        let Payload::Sentences(sentences) = gateway
            .get(QUIZ_PATH, &[(CATEGORY_ID_PARAM, "friends")])
            .await
            .unwrap()
        else {
            panic!("expected sentences");
        };
        assert!(!sentences.is_empty());
        assert!(sentences.iter().all(|q| q.category_id == "friends"));

        let inline = gateway.get("/quiz?categoryId=friends", &[]).await.unwrap();
        assert_eq!(inline, Payload::Sentences(sentences));
    }

    #[tokio::test]
    async fn test_unknown_category_is_empty_not_error() {
        let gateway = gateway(Latency::none());
        let payload = gateway
            .get(QUIZ_PATH, &[(CATEGORY_ID_PARAM, "Friends")])
            .await
            .unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let gateway = gateway(Latency::none());
        let err = gateway.get("/grammar", &[]).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(path) if path == "/grammar"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_every_call_waits_inside_latency_window() {
        let latency = Latency::default();
        let gateway = gateway(latency);

        for _ in 0..5 {
            let started = Instant::now();
            gateway.get(KANA_PATH, &[]).await.unwrap();
            let elapsed = started.elapsed();
            assert!(elapsed >= latency.min(), "{:?} too short", elapsed);
            assert!(elapsed <= latency.max() + std::time::Duration::from_millis(5));
        }
    }
}
