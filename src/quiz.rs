//! Pre-mission quiz session
//!
//! A fixed, ordered question bank with an append-only answer sheet. The
//! bank ships embedded in the binary; nothing is persisted between runs.

use serde::Deserialize;

/// Minimum correct answers (exclusive) needed to pass
pub const PASS_THRESHOLD: usize = 2;

/// Embedded question bank
const QUESTION_BANK: &str = include_str!("../assets/questions.json");

/// A single quiz question
#[derive(Debug, Clone, Deserialize)]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct: usize,
}

/// One run through the quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    /// Selected option per answered question, in order
    answers: Vec<usize>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// Session over the embedded bank
    pub fn new() -> Self {
        let questions: Vec<Question> =
            serde_json::from_str(QUESTION_BANK).expect("embedded question bank is valid JSON");
        Self::with_questions(questions)
    }

    /// Session over a custom bank (tests)
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions,
            answers: Vec::new(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Index of the question awaiting an answer
    pub fn current_index(&self) -> usize {
        self.answers.len().min(self.questions.len())
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.answers.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= self.questions.len()
    }

    /// Record an answer for the current question. Returns whether it was
    /// correct, or `None` if the quiz is already complete (extra clicks
    /// while the results screen is coming up are ignored).
    pub fn answer(&mut self, choice: usize) -> Option<bool> {
        let question = self.questions.get(self.answers.len())?;
        let correct = choice == question.correct;
        self.answers.push(choice);
        Some(correct)
    }

    /// Correct answers so far
    pub fn score(&self) -> usize {
        self.answers
            .iter()
            .zip(&self.questions)
            .filter(|(answer, q)| **answer == q.correct)
            .count()
    }

    pub fn passed(&self) -> bool {
        self.score() > PASS_THRESHOLD
    }

    /// Clear the answer sheet for a retry
    pub fn reset(&mut self) {
        self.answers.clear();
    }
}
