//! Word bank for easy-mode sentence assembly.
//!
//! The bank holds one entry per chunk, duplicates included. Placing a word
//! hides one bank copy of it; which copy is decided by position: the bank
//! entry at `position` holding `T` stays visible while the number of earlier
//! entries also holding `T` is at least the number of placed answers equal to
//! `T`. Placing one of two identical words therefore hides the earlier copy
//! and leaves the later one.

use rand::Rng;

use crate::models::Chunk;

use super::shuffled;

/// The chunk texts of a sentence in random order.
pub fn build_bank<R: Rng + ?Sized>(chunks: &[Chunk], rng: &mut R) -> Vec<String> {
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    shuffled(&texts, rng)
}

/// Whether the bank entry at `position` can still be picked.
pub fn is_visible<'a, I>(bank: &[String], position: usize, placed: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let Some(text) = bank.get(position).map(String::as_str) else {
        return false;
    };

    let total_in_answer = placed.into_iter().filter(|v| *v == text).count();
    let this_word_index = bank[..position]
        .iter()
        .filter(|v| v.as_str() == text)
        .count();

    this_word_index >= total_in_answer
}

/// Visibility of every bank entry, in bank order.
pub fn visibility<'a, I>(bank: &[String], placed: I) -> Vec<bool>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    (0..bank.len())
        .map(|position| is_visible(bank, position, placed.clone()))
        .collect()
}
