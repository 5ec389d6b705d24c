//! Content types served by the data layer and consumed by the quiz engines.

mod category;
mod question;

pub use category::Category;
pub use question::{Chunk, KanaQuestion, KanaScript, SentenceQuestion, WordPicQuestion};
