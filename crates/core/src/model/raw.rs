use serde::{Deserialize, Serialize};

use crate::model::ids::CardId;

/// Question record as it appears in the question bank file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawQuestion {
    pub id: CardId,
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

/// A named category grouping several questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCategory {
    pub category: String,
    #[serde(default)]
    pub questions: Vec<RawQuestion>,
}

/// Nested category/question data, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawBank {
    pub categories: Vec<RawCategory>,
}

impl RawBank {
    #[must_use]
    pub fn new(categories: Vec<RawCategory>) -> Self {
        Self { categories }
    }

    /// Total number of questions across all categories.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }
}
