use std::sync::Arc;

use flash_core::load_cards;
use flash_core::model::CardBank;
use storage::repository::{QuestionBankSource, Storage};

use crate::override_resolver::OverrideResolver;

/// Builds the card bank from the question source and current overrides.
#[derive(Clone)]
pub struct CardSourceService {
    questions: Arc<dyn QuestionBankSource>,
    overrides: OverrideResolver,
}

impl CardSourceService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionBankSource>, overrides: OverrideResolver) -> Self {
        Self {
            questions,
            overrides,
        }
    }

    #[must_use]
    pub fn from_storage(storage: &Storage) -> Self {
        Self::new(
            Arc::clone(&storage.questions),
            OverrideResolver::new(Arc::clone(&storage.settings)),
        )
    }

    #[must_use]
    pub fn overrides(&self) -> &OverrideResolver {
        &self.overrides
    }

    /// Load a fresh card bank.
    ///
    /// An unavailable or malformed question source yields an empty bank; the
    /// caller renders that as "no content".
    pub async fn load(&self) -> CardBank {
        let raw = match self.questions.load_raw_bank().await {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("question bank unavailable, continuing with no cards: {err}");
                return Vec::new();
            }
        };
        let overrides = self.overrides.current_overrides().await;
        let cards = load_cards(&raw, &overrides);
        log::info!(
            "loaded {} cards ({} overrides applied)",
            cards.len(),
            overrides.len()
        );
        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flash_core::model::{
        CardId, RawBank, RawCategory, RawQuestion, VARY_BY_LOCATION_PLACEHOLDER,
    };
    use storage::repository::SettingsStore;

    fn build_bank() -> RawBank {
        RawBank::new(vec![RawCategory {
            category: "Government".into(),
            questions: vec![
                RawQuestion {
                    id: CardId::new(22),
                    question: "How many senators?".into(),
                    answers: vec!["one hundred (100)".into()],
                },
                RawQuestion {
                    id: CardId::new(23),
                    question: "Who is one of your state's senators now?".into(),
                    answers: vec![],
                },
            ],
        }])
    }

    #[tokio::test]
    async fn unavailable_source_degrades_to_empty() {
        let service = CardSourceService::from_storage(&Storage::in_memory(None));
        assert!(service.load().await.is_empty());
    }

    #[tokio::test]
    async fn applies_override_from_store() {
        let storage = Storage::in_memory(Some(build_bank()));
        storage.settings.set("senator", "Jane Doe").await.unwrap();

        let cards = CardSourceService::from_storage(&storage).load().await;
        let senator = cards.iter().find(|c| c.id() == CardId::new(23)).unwrap();
        assert_eq!(senator.answers(), ["Jane Doe".to_owned()]);
    }

    #[tokio::test]
    async fn empty_override_uses_placeholder() {
        let storage = Storage::in_memory(Some(build_bank()));
        storage.settings.set("senator", "").await.unwrap();

        let cards = CardSourceService::from_storage(&storage).load().await;
        let senator = cards.iter().find(|c| c.id() == CardId::new(23)).unwrap();
        assert_eq!(senator.answers(), [VARY_BY_LOCATION_PLACEHOLDER.to_owned()]);
        assert_eq!(cards.len(), 2);
    }
}
