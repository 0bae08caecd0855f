//! Flattens the nested question bank into the card list a deck is built from.

use std::collections::HashSet;

use crate::model::{
    Card, CardBank, Overrides, RawBank, VARY_BY_LOCATION_PLACEHOLDER, is_override_eligible,
};

/// Build the card bank from raw category/question data.
///
/// Each question becomes one card tagged with its category name, in file order.
/// Cards for location-dependent questions get a single answer: the user's
/// override when one is set, otherwise the placeholder text. Later questions
/// reusing an id already seen are skipped so every card id is unique.
#[must_use]
pub fn load_cards(raw: &RawBank, overrides: &Overrides) -> CardBank {
    let mut seen = HashSet::with_capacity(raw.question_count());
    let mut cards = Vec::with_capacity(raw.question_count());

    for category in &raw.categories {
        for question in &category.questions {
            if !seen.insert(question.id) {
                continue;
            }

            let card = Card::new(
                question.id,
                category.category.as_str(),
                question.question.as_str(),
                question.answers.clone(),
            );

            let card = if is_override_eligible(question.id) {
                let answer = overrides
                    .get(question.id)
                    .unwrap_or(VARY_BY_LOCATION_PLACEHOLDER);
                card.with_single_answer(answer)
            } else {
                card
            };

            cards.push(card);
        }
    }

    cards
}
