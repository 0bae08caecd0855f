use crate::model::ids::CardId;

//
// ─── CARD ──────────────────────────────────────────────────────────────────────
//

/// A single question/answer flashcard.
///
/// Identity is `id`; equality and hashing cover every field so two cards that
/// share an id but differ in content are still told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Card {
    id: CardId,
    category: String,
    question: String,
    answers: Vec<String>,
}

impl Card {
    #[must_use]
    pub fn new(
        id: CardId,
        category: impl Into<String>,
        question: impl Into<String>,
        answers: Vec<String>,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            question: question.into(),
            answers,
        }
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    /// Returns the card with its answers replaced by a single line.
    #[must_use]
    pub fn with_single_answer(mut self, answer: impl Into<String>) -> Self {
        self.answers = vec![answer.into()];
        self
    }
}

/// The full universe of cards for a session. May be empty.
pub type CardBank = Vec<Card>;

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
