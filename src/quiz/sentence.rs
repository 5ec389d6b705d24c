//! Sentence construction engine.
//!
//! A session walks the sentences of one category. Each sentence is answered
//! chunk by chunk, either by typing (hard mode) or by placing words from a
//! shuffled bank (easy mode), then graded by exact comparison.

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::QuizError;
use crate::config::Timings;
use crate::models::{Chunk, SentenceQuestion};

use super::word_bank::{build_bank, visibility};
use super::{Hold, HoldSlot, Progress, SessionStats};

const PERFECT_MESSAGE: &str = "Natural phrasing! Anyone would be glad to hear it.";
const CORRECTION_MESSAGE: &str =
    "The meaning may not come across yet. Particles matter a lot in Japanese.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Assemble the sentence from a word bank.
    Easy,
    /// Type every chunk from memory.
    #[default]
    Hard,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Easy => Mode::Hard,
            Mode::Hard => Mode::Easy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Answering,
    /// Grading hold in progress; input is blocked.
    Checking,
    /// Feedback is shown until dismissed.
    Reviewing,
    /// Every sentence of the category has been visited.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub is_perfect: bool,
    /// The full reference sentence, only for imperfect answers.
    pub correction: Option<String>,
    pub message: &'static str,
    pub hints_used: usize,
}

/// True when every chunk's trimmed answer equals its text exactly.
pub fn is_perfect(chunks: &[Chunk], answers: &HashMap<u32, String>) -> bool {
    chunks.iter().all(|chunk| {
        answers
            .get(&chunk.id)
            .map(|value| value.trim())
            .unwrap_or("")
            == chunk.text
    })
}

pub struct SentenceQuiz {
    questions: Vec<SentenceQuestion>,
    current_index: usize,
    mode: Mode,
    phase: Phase,
    user_answers: HashMap<u32, String>,
    hint_used: HashSet<u32>,
    bank_items: Vec<String>,
    feedback: Option<Feedback>,
    checked_current: bool,
    solved_current: bool,
    stats: SessionStats,
    hold: HoldSlot,
    timings: Timings,
    rng: StdRng,
}

impl SentenceQuiz {
    /// Start a session over `questions` in the order given.
    pub fn new(
        questions: Vec<SentenceQuestion>,
        timings: Timings,
        rng: StdRng,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySession("sentence"));
        }

        info!(count = questions.len(), "sentence session started");
        let mut quiz = Self {
            questions,
            current_index: 0,
            mode: Mode::default(),
            phase: Phase::Answering,
            user_answers: HashMap::new(),
            hint_used: HashSet::new(),
            bank_items: Vec::new(),
            feedback: None,
            checked_current: false,
            solved_current: false,
            stats: SessionStats::default(),
            hold: HoldSlot::default(),
            timings,
            rng,
        };
        quiz.reset_answers();
        Ok(quiz)
    }

    pub fn current(&self) -> &SentenceQuestion {
        &self.questions[self.current_index]
    }

    /// Chunks of the current sentence, in display order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.current().chunks
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The entered value for `chunk_id`, empty when unset.
    pub fn answer(&self, chunk_id: u32) -> &str {
        self.user_answers
            .get(&chunk_id)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn is_filled(&self, chunk_id: u32) -> bool {
        !self.answer(chunk_id).is_empty()
    }

    pub fn is_hinted(&self, chunk_id: u32) -> bool {
        self.hint_used.contains(&chunk_id)
    }

    pub fn hints_used(&self) -> usize {
        self.hint_used.len()
    }

    pub fn bank_items(&self) -> &[String] {
        &self.bank_items
    }

    /// Which bank entries can still be picked, in bank order.
    pub fn bank_visibility(&self) -> Vec<bool> {
        visibility(&self.bank_items, self.user_answers.values().map(String::as_str))
    }

    /// `answered` counts sentences graded perfect, `attempts` every grading.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Feedback of the last grading, until the answers are reset.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Switch input mode. Always a hard reset of answers, hints and feedback.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.phase == Phase::Finished {
            return;
        }

        debug!(from = ?self.mode, to = ?mode, "mode switch");
        self.mode = mode;
        self.reset_answers();
    }

    fn reset_answers(&mut self) {
        self.hold.cancel();
        self.user_answers.clear();
        self.hint_used.clear();
        self.feedback = None;
        self.phase = Phase::Answering;
        self.bank_items = match self.mode {
            Mode::Easy => build_bank(&self.questions[self.current_index].chunks, &mut self.rng),
            Mode::Hard => Vec::new(),
        };
    }

    fn accepts(&self, mode: Mode) -> bool {
        self.phase == Phase::Answering && self.mode == mode
    }

    fn has_chunk(&self, chunk_id: u32) -> bool {
        self.chunks().iter().any(|c| c.id == chunk_id)
    }

    /// Replace the typed value of a chunk (hard mode).
    pub fn input(&mut self, chunk_id: u32, value: impl Into<String>) -> bool {
        if !self.accepts(Mode::Hard) || !self.has_chunk(chunk_id) {
            return false;
        }

        self.user_answers.insert(chunk_id, value.into());
        true
    }

    /// Slot that should receive focus after submitting slot `index`.
    pub fn next_slot(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.chunks().len()).then_some(next)
    }

    /// Reveal a chunk's text and mark it as hint-assisted (hard mode).
    pub fn hint(&mut self, chunk_id: u32) -> bool {
        if !self.accepts(Mode::Hard) {
            return false;
        }

        let Some(text) = self
            .chunks()
            .iter()
            .find(|c| c.id == chunk_id)
            .map(|c| c.text.clone())
        else {
            return false;
        };

        debug!(chunk_id, "hint used");
        self.user_answers.insert(chunk_id, text);
        self.hint_used.insert(chunk_id);
        true
    }

    /// Place the bank word at `position` into the first empty slot (easy mode).
    ///
    /// Returns the chunk that received it.
    pub fn pick_bank(&mut self, position: usize) -> Option<u32> {
        if !self.accepts(Mode::Easy) {
            return None;
        }
        if !self.bank_visibility().get(position).copied().unwrap_or(false) {
            return None;
        }

        let chunk_id = self
            .chunks()
            .iter()
            .find(|c| !self.is_filled(c.id))
            .map(|c| c.id)?;

        let text = self.bank_items[position].clone();
        debug!(position, chunk_id, text = %text, "bank word placed");
        self.user_answers.insert(chunk_id, text);
        Some(chunk_id)
    }

    /// Empty a filled slot, returning its word to the bank (easy mode).
    pub fn clear_slot(&mut self, chunk_id: u32) -> bool {
        if !self.accepts(Mode::Easy) || !self.is_filled(chunk_id) {
            return false;
        }

        self.user_answers.remove(&chunk_id);
        true
    }

    /// Submit the current answer for grading.
    pub fn check(&mut self) -> Option<Hold> {
        if self.phase != Phase::Answering {
            return None;
        }

        self.phase = Phase::Checking;
        self.feedback = None;
        Some(self.hold.arm(self.timings.grading))
    }

    /// Finish the grading hold identified by `ticket`.
    pub fn resolve(&mut self, ticket: u64) -> Option<Progress> {
        if self.phase != Phase::Checking || !self.hold.take(ticket) {
            debug!(ticket, "ignoring stale hold");
            return None;
        }

        let perfect = is_perfect(self.chunks(), &self.user_answers);
        self.stats.attempts += 1;
        if perfect && !self.solved_current {
            self.stats.answered += 1;
            if !self.checked_current {
                self.stats.first_try += 1;
            }
            self.solved_current = true;
        }
        self.checked_current = true;

        let feedback = Feedback {
            is_perfect: perfect,
            correction: (!perfect).then(|| self.current().correct_answer.clone()),
            message: if perfect {
                PERFECT_MESSAGE
            } else {
                CORRECTION_MESSAGE
            },
            hints_used: self.hints_used(),
        };

        info!(
            question = %self.current().id,
            perfect,
            hints = feedback.hints_used,
            "sentence graded"
        );
        self.feedback = Some(feedback);
        self.phase = Phase::Reviewing;
        Some(Progress::Graded)
    }

    /// Close the feedback; answers stay as they were.
    pub fn dismiss(&mut self) -> bool {
        if self.phase != Phase::Reviewing {
            return false;
        }

        self.phase = Phase::Answering;
        true
    }

    /// Move to the next sentence of the category.
    pub fn next_question(&mut self) -> Option<Progress> {
        if !matches!(self.phase, Phase::Answering | Phase::Reviewing) {
            return None;
        }

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.checked_current = false;
            self.solved_current = false;
            self.reset_answers();
            Some(Progress::Next)
        } else {
            self.hold.cancel();
            self.phase = Phase::Finished;
            info!("sentence session completed");
            Some(Progress::Completed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn chunk(id: u32, text: &str) -> Chunk {
        Chunk {
            id,
            text: text.to_string(),
            meaning: format!("gloss{}", id),
            width: "90px".to_string(),
        }
    }

    fn movie() -> SentenceQuestion {
        SentenceQuestion {
            id: "friends-1".to_string(),
            category_id: "friends".to_string(),
            kr_prompt: "같이 영화 보러 갈래?".to_string(),
            chunks: vec![chunk(1, "一緒に"), chunk(2, "映画を"), chunk(3, "見に行く？")],
            correct_answer: "一緒に 映画を 見に行く？".to_string(),
        }
    }

    fn slowly() -> SentenceQuestion {
        SentenceQuestion {
            id: "friends-3".to_string(),
            category_id: "friends".to_string(),
            kr_prompt: "천천히, 천천히 가자.".to_string(),
            chunks: vec![chunk(1, "ゆっくり"), chunk(2, "ゆっくり"), chunk(3, "行こう。")],
            correct_answer: "ゆっくり ゆっくり 行こう。".to_string(),
        }
    }

    fn quiz(questions: Vec<SentenceQuestion>) -> SentenceQuiz {
        SentenceQuiz::new(questions, Timings::instant(), StdRng::seed_from_u64(8)).unwrap()
    }

    fn grade(quiz: &mut SentenceQuiz) -> Feedback {
        let hold = quiz.check().unwrap();
        assert_eq!(quiz.phase(), Phase::Checking);
        assert_eq!(quiz.resolve(hold.ticket), Some(Progress::Graded));
        quiz.feedback().cloned().unwrap()
    }

    #[test]
    fn test_perfect_answer_is_trimmed_exact_match() {
        let mut quiz = quiz(vec![movie()]);
        quiz.input(1, " 一緒に");
        quiz.input(2, "映画を ");
        quiz.input(3, "見に行く？");

        let feedback = grade(&mut quiz);
        assert!(feedback.is_perfect);
        assert_eq!(feedback.correction, None);
        assert_eq!(feedback.message, PERFECT_MESSAGE);
        assert_eq!(quiz.phase(), Phase::Reviewing);
    }

    #[test]
    fn test_single_character_deviation_gets_correction() {
        let mut quiz = quiz(vec![movie()]);
        quiz.input(1, "一緒に");
        quiz.input(2, "映画を");
        quiz.input(3, "見に行く?");

        let feedback = grade(&mut quiz);
        assert!(!feedback.is_perfect);
        assert_eq!(feedback.correction.as_deref(), Some("一緒に 映画を 見に行く？"));
        assert_eq!(feedback.message, CORRECTION_MESSAGE);
    }

    #[test]
    fn test_missing_chunk_is_imperfect() {
        let mut quiz = quiz(vec![movie()]);
        quiz.input(1, "一緒に");
        quiz.input(2, "映画を");
        assert!(!grade(&mut quiz).is_perfect);
    }

    #[test]
    fn test_hint_is_idempotent_and_counts_for_grading() {
        let mut quiz = quiz(vec![movie()]);
        assert!(quiz.hint(2));
        assert!(quiz.hint(2));
        assert_eq!(quiz.answer(2), "映画を");
        assert!(quiz.is_hinted(2));
        assert_eq!(quiz.hints_used(), 1);

        quiz.hint(1);
        quiz.hint(3);
        let feedback = grade(&mut quiz);
        assert!(feedback.is_perfect);
        assert_eq!(feedback.hints_used, 3);
    }

    #[test]
    fn test_hint_rejected_for_unknown_chunk_and_in_easy_mode() {
        let mut quiz = quiz(vec![movie()]);
        assert!(!quiz.hint(99));
        quiz.set_mode(Mode::Easy);
        assert!(!quiz.hint(1));
        assert!(!quiz.input(1, "一緒に"));
    }

    #[test]
    fn test_mode_switch_clears_answers_and_hints() {
        let mut quiz = quiz(vec![movie()]);
        quiz.input(1, "一緒に");
        quiz.hint(2);
        quiz.input(3, "見に");

        quiz.set_mode(Mode::Easy);
        assert_eq!(quiz.mode(), Mode::Easy);
        assert!(quiz.chunks().iter().all(|c| !quiz.is_filled(c.id)));
        assert_eq!(quiz.hints_used(), 0);
        assert_eq!(quiz.bank_items().len(), 3);

        quiz.pick_bank(0);
        quiz.set_mode(Mode::Hard);
        assert!(quiz.chunks().iter().all(|c| !quiz.is_filled(c.id)));
        assert!(quiz.bank_items().is_empty());
    }

    #[test]
    fn test_mode_switch_closes_feedback() {
        let mut quiz = quiz(vec![movie()]);
        grade(&mut quiz);
        quiz.set_mode(Mode::Easy);
        assert_eq!(quiz.phase(), Phase::Answering);
        assert!(quiz.feedback().is_none());
    }

    #[test]
    fn test_mode_switch_during_check_drops_grading() {
        let mut quiz = quiz(vec![movie()]);
        let hold = quiz.check().unwrap();
        quiz.set_mode(Mode::Easy);
        assert_eq!(quiz.resolve(hold.ticket), None);
        assert_eq!(quiz.phase(), Phase::Answering);
        assert!(quiz.feedback().is_none());
    }

    #[test]
    fn test_bank_fills_first_empty_slot_and_hides_used_copy() {
        let mut quiz = quiz(vec![slowly()]);
        quiz.set_mode(Mode::Easy);

        let position = quiz
            .bank_items()
            .iter()
            .position(|w| w == "ゆっくり")
            .unwrap();
        assert_eq!(quiz.pick_bank(position), Some(1));
        assert_eq!(quiz.answer(1), "ゆっくり");

        let visible = quiz.bank_visibility();
        let visible_slowly = quiz
            .bank_items()
            .iter()
            .zip(&visible)
            .filter(|(w, v)| *w == "ゆっくり" && **v)
            .count();
        assert_eq!(visible_slowly, 1);
        assert!(!visible[position]);
        assert_eq!(quiz.pick_bank(position), None);

        let other = quiz
            .bank_items()
            .iter()
            .enumerate()
            .position(|(i, w)| w == "ゆっくり" && i != position)
            .unwrap();
        assert_eq!(quiz.pick_bank(other), Some(2));
        let visible = quiz.bank_visibility();
        for (shown, word) in visible.iter().zip(quiz.bank_items()) {
            assert_eq!(*shown, word != "ゆっくり");
        }
    }

    #[test]
    fn test_clear_slot_returns_word_to_bank() {
        let mut quiz = quiz(vec![movie()]);
        quiz.set_mode(Mode::Easy);
        quiz.pick_bank(0);
        quiz.pick_bank(1);
        assert_eq!(quiz.bank_visibility(), vec![false, false, true]);

        assert!(quiz.clear_slot(1));
        assert!(!quiz.is_filled(1));
        assert_eq!(quiz.bank_visibility(), vec![true, false, true]);
        assert!(!quiz.clear_slot(1));

        let last = quiz.pick_bank(2);
        assert_eq!(last, Some(1));
    }

    #[test]
    fn test_placing_every_word_empties_the_bank() {
        let mut quiz = quiz(vec![movie()]);
        quiz.set_mode(Mode::Easy);
        for position in 0..3 {
            assert!(quiz.pick_bank(position).is_some());
        }
        assert_eq!(quiz.bank_visibility(), vec![false, false, false]);
        assert_eq!(quiz.pick_bank(0), None);
    }

    #[test]
    fn test_easy_mode_assembly_grades_like_typing() {
        let mut quiz = quiz(vec![movie()]);
        quiz.set_mode(Mode::Easy);
        for text in ["一緒に", "映画を", "見に行く？"] {
            let position = quiz.bank_items().iter().position(|w| w == text).unwrap();
            quiz.pick_bank(position);
        }
        assert!(grade(&mut quiz).is_perfect);
    }

    #[test]
    fn test_stats_count_gradings() {
        let mut quiz = quiz(vec![movie(), slowly()]);
        grade(&mut quiz);
        quiz.dismiss();
        quiz.hint(1);
        quiz.hint(2);
        quiz.hint(3);
        grade(&mut quiz);
        quiz.next_question();
        quiz.hint(1);
        quiz.hint(2);
        quiz.hint(3);
        grade(&mut quiz);

        let stats = quiz.stats();
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.answered, 2);
        assert_eq!(stats.first_try, 1);
    }

    #[test]
    fn test_dismiss_keeps_answers() {
        let mut quiz = quiz(vec![movie()]);
        quiz.input(1, "一緒に");
        grade(&mut quiz);

        assert!(quiz.dismiss());
        assert_eq!(quiz.phase(), Phase::Answering);
        assert_eq!(quiz.answer(1), "一緒に");
        assert!(!quiz.dismiss());
    }

    #[test]
    fn test_input_blocked_while_checking() {
        let mut quiz = quiz(vec![movie()]);
        quiz.check().unwrap();
        assert!(!quiz.input(1, "一緒に"));
        assert!(!quiz.hint(1));
        assert!(quiz.check().is_none());
        assert!(quiz.next_question().is_none());
    }

    #[test]
    fn test_next_slot_stops_at_last_chunk() {
        let quiz = quiz(vec![movie()]);
        assert_eq!(quiz.next_slot(0), Some(1));
        assert_eq!(quiz.next_slot(1), Some(2));
        assert_eq!(quiz.next_slot(2), None);
    }

    #[test]
    fn test_progression_through_category() {
        let mut quiz = quiz(vec![movie(), slowly()]);
        quiz.set_mode(Mode::Easy);
        quiz.pick_bank(0);
        grade(&mut quiz);

        assert_eq!(quiz.next_question(), Some(Progress::Next));
        assert_eq!(quiz.current().id, "friends-3");
        assert_eq!(quiz.mode(), Mode::Easy);
        assert!(quiz.feedback().is_none());
        assert!(quiz.chunks().iter().all(|c| !quiz.is_filled(c.id)));
        assert_eq!(quiz.bank_items().len(), 3);

        assert_eq!(quiz.next_question(), Some(Progress::Completed));
        assert_eq!(quiz.phase(), Phase::Finished);
        assert_eq!(quiz.next_question(), None);
        quiz.set_mode(Mode::Hard);
        assert_eq!(quiz.mode(), Mode::Easy);
    }
}
