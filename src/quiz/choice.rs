//! Multiple-choice engine shared by the kana and picture-word quizzes.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::QuizError;
use crate::config::Timings;
use crate::models::{KanaQuestion, WordPicQuestion};

use super::{Hold, HoldSlot, Progress};

/// A question answered by picking one of its options.
pub trait ChoiceQuestion: Clone {
    /// Whether option order is randomized together with question order.
    const SHUFFLE_OPTIONS: bool;
    /// Label used in logs and result screens.
    const KIND: &'static str;

    fn prompt(&self) -> &str;
    fn answer(&self) -> &str;
    fn options(&self) -> &[String];
    fn options_mut(&mut self) -> &mut Vec<String>;

    /// Picture shown alongside the prompt, if any.
    fn illustration(&self) -> Option<&str> {
        None
    }
}

impl ChoiceQuestion for KanaQuestion {
    const SHUFFLE_OPTIONS: bool = true;
    const KIND: &'static str = "kana";

    fn prompt(&self) -> &str {
        &self.sound
    }

    fn answer(&self) -> &str {
        &self.correct_char
    }

    fn options(&self) -> &[String] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut Vec<String> {
        &mut self.options
    }
}

impl ChoiceQuestion for WordPicQuestion {
    const SHUFFLE_OPTIONS: bool = false;
    const KIND: &'static str = "word-pic";

    fn prompt(&self) -> &str {
        &self.kr_word
    }

    fn illustration(&self) -> Option<&str> {
        Some(&self.image_url)
    }

    fn answer(&self) -> &str {
        &self.answer
    }

    fn options(&self) -> &[String] {
        &self.options
    }

    fn options_mut(&mut self) -> &mut Vec<String> {
        &mut self.options
    }
}

/// What happens once every question has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExhaustPolicy {
    /// Endless drill: reshuffle and start over.
    Reshuffle,
    /// Finite session: signal completion once and stop.
    Finish,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Questions answered correctly (eventually).
    pub answered: usize,
    /// Questions answered correctly without a wrong pick first.
    pub first_try: usize,
    /// Every pick, right or wrong.
    pub attempts: usize,
    /// Completed passes over the collection.
    pub cycles: usize,
}

pub struct ChoiceQuiz<Q> {
    questions: Vec<Q>,
    current_index: usize,
    selected_option: Option<String>,
    is_correct: Option<bool>,
    missed_current: bool,
    finished: bool,
    hold: HoldSlot,
    policy: ExhaustPolicy,
    timings: Timings,
    stats: SessionStats,
    rng: StdRng,
}

impl<Q: ChoiceQuestion> ChoiceQuiz<Q> {
    /// Start a session over `questions` in random order.
    pub fn new(
        questions: Vec<Q>,
        policy: ExhaustPolicy,
        timings: Timings,
        rng: StdRng,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::EmptySession(Q::KIND));
        }

        let mut quiz = Self {
            questions,
            current_index: 0,
            selected_option: None,
            is_correct: None,
            missed_current: false,
            finished: false,
            hold: HoldSlot::default(),
            policy,
            timings,
            stats: SessionStats::default(),
            rng,
        };
        quiz.randomize();
        info!(kind = Q::KIND, count = quiz.questions.len(), ?policy, "choice session started");
        Ok(quiz)
    }

    fn randomize(&mut self) {
        self.questions.shuffle(&mut self.rng);
        if Q::SHUFFLE_OPTIONS {
            for question in self.questions.iter_mut() {
                question.options_mut().shuffle(&mut self.rng);
            }
        }
    }

    pub fn questions(&self) -> &[Q] {
        &self.questions
    }

    pub fn current(&self) -> &Q {
        &self.questions[self.current_index]
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

    pub fn selected_option(&self) -> Option<&str> {
        self.selected_option.as_deref()
    }

    pub fn is_correct(&self) -> Option<bool> {
        self.is_correct
    }

    /// A selection is waiting for its hold to elapse.
    pub fn is_pending(&self) -> bool {
        self.selected_option.is_some()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn policy(&self) -> ExhaustPolicy {
        self.policy
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Pick `option` for the current question.
    ///
    /// Returns the hold to wait out, or `None` when the pick was ignored
    /// because another one is pending or the session is over.
    pub fn select_option(&mut self, option: &str) -> Option<Hold> {
        if self.finished || self.is_pending() {
            return None;
        }

        let correct = option == self.current().answer();
        self.selected_option = Some(option.to_string());
        self.is_correct = Some(correct);
        self.stats.attempts += 1;

        debug!(
            kind = Q::KIND,
            index = self.current_index,
            option,
            correct,
            "option selected"
        );

        let duration = if correct {
            self.stats.answered += 1;
            if !self.missed_current {
                self.stats.first_try += 1;
            }
            self.timings.correct_hold
        } else {
            self.missed_current = true;
            self.timings.incorrect_hold
        };

        Some(self.hold.arm(duration))
    }

    /// Finish the hold identified by `ticket`.
    pub fn resolve(&mut self, ticket: u64) -> Option<Progress> {
        if !self.hold.take(ticket) {
            debug!(kind = Q::KIND, ticket, "ignoring stale hold");
            return None;
        }

        match self.is_correct {
            Some(true) => self.advance(),
            _ => {
                self.clear_selection();
                Some(Progress::Retry)
            }
        }
    }

    /// Move past the current question.
    ///
    /// Returns `None` once a finite session has already completed.
    pub fn advance(&mut self) -> Option<Progress> {
        if self.finished {
            return None;
        }

        self.clear_selection();
        self.missed_current = false;

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            return Some(Progress::Next);
        }

        self.stats.cycles += 1;
        match self.policy {
            ExhaustPolicy::Reshuffle => {
                self.randomize();
                self.current_index = 0;
                debug!(kind = Q::KIND, cycles = self.stats.cycles, "collection reshuffled");
                Some(Progress::Cycled)
            }
            ExhaustPolicy::Finish => {
                self.finished = true;
                info!(kind = Q::KIND, stats = ?self.stats, "choice session completed");
                Some(Progress::Completed)
            }
        }
    }

    fn clear_selection(&mut self) {
        self.hold.cancel();
        self.selected_option = None;
        self.is_correct = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    use crate::models::KanaScript;

    const CHARS: [&str; 10] = ["あ", "い", "う", "え", "お", "か", "き", "く", "け", "こ"];

    fn ten_kana() -> Vec<KanaQuestion> {
        (0..10)
            .map(|i| KanaQuestion {
                id: i as u32 + 1,
                sound: format!("s{}", i),
                correct_char: CHARS[i].to_string(),
                options: vec![
                    CHARS[i].to_string(),
                    CHARS[(i + 1) % 10].to_string(),
                    CHARS[(i + 2) % 10].to_string(),
                    CHARS[(i + 3) % 10].to_string(),
                ],
                script: KanaScript::Hiragana,
                row: None,
            })
            .collect()
    }

    fn quiz(policy: ExhaustPolicy) -> ChoiceQuiz<KanaQuestion> {
        ChoiceQuiz::new(ten_kana(), policy, Timings::instant(), StdRng::seed_from_u64(42)).unwrap()
    }

    fn wrong_option(quiz: &ChoiceQuiz<KanaQuestion>) -> String {
        let answer = quiz.current().answer();
        quiz.current()
            .options()
            .iter()
            .find(|o| o.as_str() != answer)
            .cloned()
            .unwrap()
    }

    fn answer_correctly(quiz: &mut ChoiceQuiz<KanaQuestion>) -> Option<Progress> {
        let answer = quiz.current().answer().to_string();
        let hold = quiz.select_option(&answer).unwrap();
        quiz.resolve(hold.ticket)
    }

    #[test]
    fn test_empty_collection_is_rejected() {
        let result = ChoiceQuiz::<KanaQuestion>::new(
            Vec::new(),
            ExhaustPolicy::Finish,
            Timings::instant(),
            StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(QuizError::EmptySession("kana"))));
    }

    #[test]
    fn test_initial_shuffle_is_a_permutation() {
        let quiz = quiz(ExhaustPolicy::Finish);
        let original = ten_kana();

        let mut ids: Vec<u32> = quiz.questions().iter().map(|q| q.id).collect();
        ids.sort();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        for question in quiz.questions() {
            let source = original.iter().find(|q| q.id == question.id).unwrap();
            let mut shuffled = question.options.clone();
            let mut expected = source.options.clone();
            shuffled.sort();
            expected.sort();
            assert_eq!(shuffled, expected);
        }
    }

    #[test]
    fn test_selection_while_pending_is_noop() {
        let mut quiz = quiz(ExhaustPolicy::Finish);
        let wrong = wrong_option(&quiz);
        let answer = quiz.current().answer().to_string();

        let hold = quiz.select_option(&wrong).unwrap();
        let index = quiz.current_index();

        assert_eq!(quiz.select_option(&answer), None);
        assert_eq!(quiz.selected_option(), Some(wrong.as_str()));
        assert_eq!(quiz.is_correct(), Some(false));
        assert_eq!(quiz.current_index(), index);
        assert_eq!(quiz.stats().attempts, 1);

        assert_eq!(quiz.resolve(hold.ticket), Some(Progress::Retry));
    }

    #[test]
    fn test_wrong_answer_represents_same_question() {
        let mut quiz = quiz(ExhaustPolicy::Finish);
        let id = quiz.current().id;
        let wrong = wrong_option(&quiz);

        let hold = quiz.select_option(&wrong).unwrap();
        assert_eq!(hold.duration, Timings::instant().incorrect_hold);
        assert_eq!(quiz.resolve(hold.ticket), Some(Progress::Retry));

        assert_eq!(quiz.current().id, id);
        assert_eq!(quiz.selected_option(), None);
        assert_eq!(quiz.is_correct(), None);

        assert_eq!(answer_correctly(&mut quiz), Some(Progress::Next));
        let stats = quiz.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.first_try, 0);
        assert_eq!(stats.attempts, 2);
    }

    #[test]
    fn test_stale_ticket_is_ignored() {
        let mut quiz = quiz(ExhaustPolicy::Finish);
        let wrong = wrong_option(&quiz);
        let hold = quiz.select_option(&wrong).unwrap();
        assert_eq!(quiz.resolve(hold.ticket + 1), None);
        assert!(quiz.is_pending());
        assert_eq!(quiz.resolve(hold.ticket), Some(Progress::Retry));
        assert_eq!(quiz.resolve(hold.ticket), None);
    }

    #[test]
    fn test_finite_session_completes_once_after_visiting_every_index() {
        let mut quiz = quiz(ExhaustPolicy::Finish);
        let mut visited = vec![quiz.current_index()];
        let mut completions = 0;

        for _ in 0..10 {
            match answer_correctly(&mut quiz) {
                Some(Progress::Next) => visited.push(quiz.current_index()),
                Some(Progress::Completed) => completions += 1,
                other => panic!("unexpected progress {:?}", other),
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
        assert!(quiz.is_finished());
        assert_eq!(quiz.stats().first_try, 10);

        let answer = quiz.current().answer().to_string();
        assert_eq!(quiz.select_option(&answer), None);
        assert_eq!(quiz.advance(), None);
    }

    #[test]
    fn test_infinite_session_cycles_with_fresh_shuffle() {
        let mut quiz = quiz(ExhaustPolicy::Reshuffle);

        for _ in 0..9 {
            assert_eq!(answer_correctly(&mut quiz), Some(Progress::Next));
        }
        assert_eq!(answer_correctly(&mut quiz), Some(Progress::Cycled));

        assert_eq!(quiz.current_index(), 0);
        assert!(!quiz.is_finished());
        assert_eq!(quiz.stats().cycles, 1);
        assert_eq!(quiz.len(), 10);

        assert_eq!(answer_correctly(&mut quiz), Some(Progress::Next));
    }

    #[test]
    fn test_word_pic_options_keep_their_order() {
        let questions: Vec<WordPicQuestion> = (0..5)
            .map(|i| WordPicQuestion {
                id: i,
                image_url: format!("img{}.png", i),
                kr_word: format!("단어{}", i),
                answer: "ねこ".to_string(),
                options: vec!["いぬ".to_string(), "ねこ".to_string(), "とり".to_string()],
            })
            .collect();
        let quiz = ChoiceQuiz::new(
            questions,
            ExhaustPolicy::Finish,
            Timings::instant(),
            StdRng::seed_from_u64(9),
        )
        .unwrap();

        for question in quiz.questions() {
            assert_eq!(question.options, vec!["いぬ", "ねこ", "とり"]);
        }
    }
}
