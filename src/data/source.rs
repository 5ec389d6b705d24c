//! Data source capability.
//!
//! Screens only talk to [`DataSource`]. Which implementation sits behind it is
//! decided once from [`Config`], never by intercepting a transport.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::{Config, SourceKind};
use crate::models::{Category, KanaQuestion, SentenceQuestion, WordPicQuestion};

use super::gateway::{
    CATEGORIES_PATH, CATEGORY_ID_PARAM, KANA_PATH, MockGateway, Payload, QUIZ_PATH, WORD_PIC_PATH,
};
use super::validate::{validate_categories, validate_kana, validate_sentences, validate_word_pics};
use super::{ContentStore, FetchError, LoadError};

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError>;

    async fn fetch_kana(&self) -> Result<Vec<KanaQuestion>, FetchError>;

    async fn fetch_word_pics(&self) -> Result<Vec<WordPicQuestion>, FetchError>;

    /// Sentences whose `category_id` equals `category_id` exactly.
    async fn fetch_sentences_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<SentenceQuestion>, FetchError>;
}

/// Serves the content store through the mock gateway.
pub struct FixtureSource {
    gateway: MockGateway,
}

impl FixtureSource {
    pub fn new(gateway: MockGateway) -> Self {
        Self { gateway }
    }
}

fn unexpected(path: &str) -> FetchError {
    FetchError::Unexpected {
        path: path.to_string(),
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        match self.gateway.get(CATEGORIES_PATH, &[]).await? {
            Payload::Categories(items) => Ok(items),
            _ => Err(unexpected(CATEGORIES_PATH)),
        }
    }

    async fn fetch_kana(&self) -> Result<Vec<KanaQuestion>, FetchError> {
        match self.gateway.get(KANA_PATH, &[]).await? {
            Payload::Kana(items) => Ok(items),
            _ => Err(unexpected(KANA_PATH)),
        }
    }

    async fn fetch_word_pics(&self) -> Result<Vec<WordPicQuestion>, FetchError> {
        match self.gateway.get(WORD_PIC_PATH, &[]).await? {
            Payload::WordPics(items) => Ok(items),
            _ => Err(unexpected(WORD_PIC_PATH)),
        }
    }

    async fn fetch_sentences_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<SentenceQuestion>, FetchError> {
        let query = [(CATEGORY_ID_PARAM, category_id)];
        match self.gateway.get(QUIZ_PATH, &query).await? {
            Payload::Sentences(items) => Ok(items),
            _ => Err(unexpected(QUIZ_PATH)),
        }
    }
}

/// Fetches the same paths from an HTTP API.
pub struct RemoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, FetchError> {
        let url = self.url(path);
        debug!(%url, "remote request");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl DataSource for RemoteSource {
    async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        let items = self.get_json(CATEGORIES_PATH, &[]).await?;
        validate_categories(&items)?;
        Ok(items)
    }

    async fn fetch_kana(&self) -> Result<Vec<KanaQuestion>, FetchError> {
        let items = self.get_json(KANA_PATH, &[]).await?;
        validate_kana(&items)?;
        Ok(items)
    }

    async fn fetch_word_pics(&self) -> Result<Vec<WordPicQuestion>, FetchError> {
        let items = self.get_json(WORD_PIC_PATH, &[]).await?;
        validate_word_pics(&items)?;
        Ok(items)
    }

    async fn fetch_sentences_by_category(
        &self,
        category_id: &str,
    ) -> Result<Vec<SentenceQuestion>, FetchError> {
        let items = self
            .get_json(QUIZ_PATH, &[(CATEGORY_ID_PARAM, category_id)])
            .await?;
        validate_sentences(&items)?;
        Ok(items)
    }
}

/// Build the data source selected by `config`.
pub fn build_source(config: &Config) -> Result<Arc<dyn DataSource>, LoadError> {
    match config.source {
        SourceKind::Fixture => {
            let store = match &config.data_dir {
                Some(dir) => ContentStore::with_overrides(dir)?,
                None => ContentStore::bundled()?,
            };
            info!(
                categories = store.categories.len(),
                kana = store.kana.len(),
                word_pics = store.word_pics.len(),
                sentences = store.sentences.len(),
                "using fixture data source"
            );
            let gateway = MockGateway::new(Arc::new(store), config.latency);
            Ok(Arc::new(FixtureSource::new(gateway)))
        }
        SourceKind::Remote => {
            info!(base_url = %config.base_url, "using remote data source");
            Ok(Arc::new(RemoteSource::new(config.base_url.clone())))
        }
    }
}
