//! Bundled question datasets.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::models::{Category, KanaQuestion, SentenceQuestion, WordPicQuestion};

use super::loader::{load_collection_from_path, parse_collection};
use super::validate::{validate_categories, validate_kana, validate_sentences, validate_word_pics};
use super::LoadError;

const CATEGORIES_FILE: &str = "categories.json";
const KANA_FILE: &str = "kana.json";
const WORD_PIC_FILE: &str = "word_pic.json";
const SENTENCES_FILE: &str = "sentences.json";

const CATEGORIES_JSON: &str = include_str!("../../assets/categories.json");
const KANA_JSON: &str = include_str!("../../assets/kana.json");
const WORD_PIC_JSON: &str = include_str!("../../assets/word_pic.json");
const SENTENCES_JSON: &str = include_str!("../../assets/sentences.json");

/// Read-only content, loaded wholesale and validated once.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    pub categories: Vec<Category>,
    pub kana: Vec<KanaQuestion>,
    pub word_pics: Vec<WordPicQuestion>,
    pub sentences: Vec<SentenceQuestion>,
}

impl ContentStore {
    /// The datasets compiled into the binary.
    pub fn bundled() -> Result<Self, LoadError> {
        let store = Self {
            categories: parse_collection(CATEGORIES_FILE, CATEGORIES_JSON)?,
            kana: parse_collection(KANA_FILE, KANA_JSON)?,
            word_pics: parse_collection(WORD_PIC_FILE, WORD_PIC_JSON)?,
            sentences: parse_collection(SENTENCES_FILE, SENTENCES_JSON)?,
        };
        store.validate()?;
        Ok(store)
    }

    /// The bundled datasets, with any of the four files present in `dir`
    /// replacing its bundled counterpart.
    pub fn with_overrides<P: AsRef<Path>>(dir: P) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut store = Self::bundled()?;

        override_from(dir, CATEGORIES_FILE, &mut store.categories)?;
        override_from(dir, KANA_FILE, &mut store.kana)?;
        override_from(dir, WORD_PIC_FILE, &mut store.word_pics)?;
        override_from(dir, SENTENCES_FILE, &mut store.sentences)?;

        store.validate()?;
        Ok(store)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        validate_categories(&self.categories)?;
        validate_kana(&self.kana)?;
        validate_word_pics(&self.word_pics)?;
        validate_sentences(&self.sentences)
    }
}

fn override_from<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    target: &mut Vec<T>,
) -> Result<(), LoadError> {
    let path = dir.join(file);
    if !path.is_file() {
        debug!(path = %path.display(), "no override, keeping bundled data");
        return Ok(());
    }

    *target = load_collection_from_path(&path)?;
    info!(path = %path.display(), count = target.len(), "loaded dataset override");
    Ok(())
}
