//! Content store, mock gateway and the data source capability.

mod error;
mod fixtures;
pub mod gateway;
mod loader;
mod source;
mod validate;

pub use error::FetchError;
pub use fixtures::ContentStore;
pub use gateway::{MockGateway, Payload};
pub use loader::{LoadError, load_collection_from_path, parse_collection};
pub use source::{DataSource, FixtureSource, RemoteSource, build_source};
pub use validate::{validate_categories, validate_kana, validate_sentences, validate_word_pics};
