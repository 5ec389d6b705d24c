//! Load-time content rules.
//!
//! A choice question whose options do not contain its answer exactly once
//! would silently become unanswerable, so every collection goes through these
//! checks before a quiz engine sees it.

use std::collections::HashSet;

use crate::models::{Category, KanaQuestion, SentenceQuestion, WordPicQuestion};

use super::LoadError;

const MIN_OPTIONS: usize = 2;

fn invalid(kind: &'static str, id: impl ToString, reason: impl Into<String>) -> LoadError {
    LoadError::Invalid {
        kind,
        id: id.to_string(),
        reason: reason.into(),
    }
}

fn check_options(
    kind: &'static str,
    id: u32,
    answer: &str,
    options: &[String],
) -> Result<(), LoadError> {
    if options.len() < MIN_OPTIONS {
        return Err(invalid(
            kind,
            id,
            format!("needs at least {} options, has {}", MIN_OPTIONS, options.len()),
        ));
    }

    let matching = options.iter().filter(|option| *option == answer).count();
    if matching != 1 {
        return Err(invalid(
            kind,
            id,
            format!("answer {:?} appears {} times among options", answer, matching),
        ));
    }

    Ok(())
}

pub fn validate_kana(questions: &[KanaQuestion]) -> Result<(), LoadError> {
    questions
        .iter()
        .try_for_each(|q| check_options("kana", q.id, &q.correct_char, &q.options))
}

pub fn validate_word_pics(questions: &[WordPicQuestion]) -> Result<(), LoadError> {
    questions
        .iter()
        .try_for_each(|q| check_options("word-pic", q.id, &q.answer, &q.options))
}

pub fn validate_sentences(questions: &[SentenceQuestion]) -> Result<(), LoadError> {
    for question in questions {
        if question.chunks.is_empty() {
            return Err(invalid("sentence", &question.id, "has no chunks"));
        }

        let mut seen = HashSet::new();
        for chunk in &question.chunks {
            if !seen.insert(chunk.id) {
                return Err(invalid(
                    "sentence",
                    &question.id,
                    format!("duplicate chunk id {}", chunk.id),
                ));
            }
        }
    }

    Ok(())
}

pub fn validate_categories(categories: &[Category]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for category in categories {
        if !seen.insert(category.id.as_str()) {
            return Err(invalid("category", &category.id, "duplicate id"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Chunk, KanaScript};

    fn kana(options: &[&str]) -> KanaQuestion {
        KanaQuestion {
            id: 7,
            sound: "아".to_string(),
            correct_char: "あ".to_string(),
            options: options.iter().map(|s| s.to_string()).collect(),
            script: KanaScript::Hiragana,
            row: None,
        }
    }

    #[test]
    fn test_answer_must_appear_exactly_once() {
        assert!(validate_kana(&[kana(&["あ", "い", "う"])]).is_ok());
        assert!(validate_kana(&[kana(&["い", "う"])]).is_err());
        assert!(validate_kana(&[kana(&["あ", "あ", "う"])]).is_err());
        assert!(validate_kana(&[kana(&["あ"])]).is_err());
    }

    #[test]
    fn test_invalid_error_names_question() {
        let err = validate_kana(&[kana(&["い", "う"])]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("kana"));
        assert!(message.contains('7'));
    }

    #[test]
    fn test_sentence_rules() {
        let chunk = |id| Chunk {
            id,
            text: "駅で".to_string(),
            meaning: "역에서".to_string(),
            width: String::new(),
        };
        let mut question = SentenceQuestion {
            id: "s1".to_string(),
            category_id: "travel".to_string(),
            kr_prompt: "역에서".to_string(),
            chunks: vec![chunk(1), chunk(2)],
            correct_answer: "駅で 駅で".to_string(),
        };
        assert!(validate_sentences(std::slice::from_ref(&question)).is_ok());

        question.chunks = vec![chunk(1), chunk(1)];
        assert!(validate_sentences(std::slice::from_ref(&question)).is_err());

        question.chunks.clear();
        assert!(validate_sentences(&[question]).is_err());
    }
}
