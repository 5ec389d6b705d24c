use std::fmt;

use serde::{Deserialize, Serialize};

/// Which kana syllabary a question drills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KanaScript {
    Hiragana,
    Katakana,
}

impl KanaScript {
    pub fn toggled(self) -> Self {
        match self {
            KanaScript::Hiragana => KanaScript::Katakana,
            KanaScript::Katakana => KanaScript::Hiragana,
        }
    }
}

impl fmt::Display for KanaScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KanaScript::Hiragana => write!(f, "hiragana"),
            KanaScript::Katakana => write!(f, "katakana"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KanaQuestion {
    pub id: u32,
    /// Pronunciation shown as the prompt.
    pub sound: String,
    pub correct_char: String,
    pub options: Vec<String>,
    #[serde(rename = "type")]
    pub script: KanaScript,
    #[serde(default)]
    pub row: Option<String>,
}

impl KanaQuestion {
    /// True when the question belongs to `script` and, if given, to `row`.
    pub fn matches(&self, script: KanaScript, row: Option<&str>) -> bool {
        self.script == script && row.is_none_or(|row| self.row.as_deref() == Some(row))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPicQuestion {
    pub id: u32,
    pub image_url: String,
    pub kr_word: String,
    pub answer: String,
    pub options: Vec<String>,
}

/// One fill-in slot of a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: u32,
    pub text: String,
    /// Gloss in the learner's language, shown while the slot is empty.
    pub meaning: String,
    #[serde(default)]
    pub width: String,
}

impl Chunk {
    /// Terminal cells suggested by the `width` hint (`"120px"` maps to 12).
    pub fn width_hint(&self) -> Option<u16> {
        let digits = self.width.trim().trim_end_matches("px");
        digits.parse::<u16>().ok().map(|px| px / 10)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceQuestion {
    pub id: String,
    pub category_id: String,
    pub kr_prompt: String,
    pub chunks: Vec<Chunk>,
    pub correct_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kana_wire_format() {
        let json = r#"{"id":1,"sound":"아","correctChar":"あ","options":["あ","い"],"type":"hiragana","row":"a"}"#;
        let question: KanaQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.script, KanaScript::Hiragana);
        assert_eq!(question.row.as_deref(), Some("a"));
        assert!(question.matches(KanaScript::Hiragana, None));
        assert!(question.matches(KanaScript::Hiragana, Some("a")));
        assert!(!question.matches(KanaScript::Hiragana, Some("ka")));
        assert!(!question.matches(KanaScript::Katakana, None));
    }

    #[test]
    fn test_chunk_width_hint() {
        let mut chunk = Chunk {
            id: 1,
            text: "映画を".to_string(),
            meaning: "영화를".to_string(),
            width: "90px".to_string(),
        };
        assert_eq!(chunk.width_hint(), Some(9));
        chunk.width = "auto".to_string();
        assert_eq!(chunk.width_hint(), None);
    }
}
