use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::deck::timer::{RevealScheduler, RevealTimer, TimerToken};
use crate::model::{Card, CardBank, DeckSettings};

//
// ─── VIEW TYPES ────────────────────────────────────────────────────────────────
//

/// Direction of the last navigation, for transition animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Size of the loaded card bank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeckTotal {
    /// `initialize` has not been called yet.
    NotLoaded,
    /// A bank was loaded but holds no cards.
    Empty,
    Loaded(usize),
}

/// Read-only view of the engine, suitable for rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub current: Option<Card>,
    pub is_revealed: bool,
    pub is_complete: bool,
    pub direction: Direction,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub remaining: usize,
    pub total: DeckTotal,
    /// Zero-based index of the current card in history.
    pub position: Option<usize>,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// Shuffled deck with replayable history and a timed auto reveal.
///
/// Unseen cards are popped from the tail of the shuffled deck. Visited cards
/// are appended to `history`, and `cursor` points at the displayed one, so
/// moving back and then forward replays history before drawing anything new.
pub struct DeckEngine {
    settings: DeckSettings,
    all_cards: CardBank,
    loaded: bool,
    deck: Vec<Card>,
    history: Vec<Card>,
    cursor: Option<usize>,
    is_revealed: bool,
    is_complete: bool,
    direction: Direction,
    timer: RevealTimer,
    rng: StdRng,
}

impl DeckEngine {
    /// Creates an engine with no cards loaded and a manually fired timer.
    #[must_use]
    pub fn new(settings: DeckSettings) -> Self {
        Self {
            settings,
            all_cards: Vec::new(),
            loaded: false,
            deck: Vec::new(),
            history: Vec::new(),
            cursor: None,
            is_revealed: false,
            is_complete: false,
            direction: Direction::Forward,
            timer: RevealTimer::manual(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Deliver auto reveals through the given host scheduler.
    #[must_use]
    pub fn with_timer(mut self, backend: Box<dyn RevealScheduler>) -> Self {
        self.timer = RevealTimer::new(backend);
        self
    }

    /// Use a deterministic shuffle.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    #[must_use]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    //
    // ─── OPERATIONS ────────────────────────────────────────────────────────────
    //

    /// Replace the card bank and start a fresh session.
    pub fn initialize(&mut self, bank: CardBank) {
        self.all_cards = bank;
        self.loaded = true;
        self.reset_deck();
    }

    /// Reshuffle every card, clear history, and show the first card.
    pub fn reset_deck(&mut self) {
        self.timer.cancel();
        self.is_complete = false;
        self.is_revealed = false;

        let mut deck = self.all_cards.clone();
        deck.shuffle(&mut self.rng);
        self.deck = deck;

        self.history.clear();
        self.cursor = None;
        self.advance();
    }

    /// Move to the next card: replay forward history if any, otherwise draw
    /// from the deck, otherwise mark the session complete.
    pub fn advance(&mut self) {
        self.is_revealed = false;
        self.timer.cancel();
        self.direction = Direction::Forward;

        if self.can_go_forward() {
            self.cursor = Some(self.cursor.map_or(0, |c| c + 1));
            self.is_complete = false;
        } else {
            let Some(card) = self.deck.pop() else {
                self.is_complete = true;
                return;
            };
            self.history.truncate(self.cursor.map_or(0, |c| c + 1));
            self.history.push(card);
            self.cursor = Some(self.history.len() - 1);
            self.is_complete = false;
        }

        self.schedule_reveal();
    }

    /// Move to the previous card in history. No-op on the first card.
    pub fn retreat(&mut self) {
        let Some(cursor) = self.cursor.filter(|c| *c > 0) else {
            return;
        };

        self.is_revealed = false;
        self.timer.cancel();
        self.direction = Direction::Backward;
        self.cursor = Some(cursor - 1);
        self.is_complete = false;
        self.schedule_reveal();
    }

    /// Reveal the current card, or advance if it is already revealed.
    ///
    /// With no card on screen (complete or empty deck) this is a no-op.
    pub fn toggle_reveal(&mut self) {
        if self.current_card().is_none() {
            return;
        }
        if self.is_revealed {
            self.advance();
        } else {
            self.is_revealed = true;
            self.timer.cancel();
        }
    }

    /// Apply a timer fire. Returns false if `token` is no longer pending.
    pub fn fire_reveal(&mut self, token: TimerToken) -> bool {
        if !self.timer.take_if_pending(token) || self.current_card().is_none() {
            return false;
        }
        self.is_revealed = true;
        true
    }

    /// Settings apply from the next scheduled reveal onward.
    pub fn set_settings(&mut self, settings: DeckSettings) {
        if !settings.auto_reveal_enabled() {
            self.timer.cancel();
        }
        self.settings = settings;
    }

    fn schedule_reveal(&mut self) {
        if self.current_card().is_none() {
            return;
        }
        if let Some(delay) = self.settings.auto_reveal_delay() {
            self.timer.schedule(delay);
        }
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        if self.is_complete {
            return None;
        }
        self.cursor.and_then(|c| self.history.get(c))
    }

    #[must_use]
    pub fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        match self.cursor {
            Some(c) => c + 1 < self.history.len(),
            None => !self.history.is_empty(),
        }
    }

    /// Unseen cards plus the one on screen.
    #[must_use]
    pub fn remaining_count(&self) -> usize {
        self.deck.len() + usize::from(self.current_card().is_some())
    }

    #[must_use]
    pub fn total(&self) -> DeckTotal {
        match (self.loaded, self.all_cards.len()) {
            (false, _) => DeckTotal::NotLoaded,
            (true, 0) => DeckTotal::Empty,
            (true, n) => DeckTotal::Loaded(n),
        }
    }

    /// Bank size, or `None` when nothing (or nothing non-empty) is loaded.
    #[must_use]
    pub fn total_count(&self) -> Option<usize> {
        match self.total() {
            DeckTotal::Loaded(n) => Some(n),
            DeckTotal::NotLoaded | DeckTotal::Empty => None,
        }
    }

    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    #[must_use]
    pub fn history(&self) -> &[Card] {
        &self.history
    }

    /// Cards not yet drawn, in shuffled order; the next draw is the last one.
    #[must_use]
    pub fn pending_deck(&self) -> &[Card] {
        &self.deck
    }

    #[must_use]
    pub fn pending_reveal(&self) -> Option<TimerToken> {
        self.timer.pending()
    }

    #[must_use]
    pub fn settings(&self) -> &DeckSettings {
        &self.settings
    }

    #[must_use]
    pub fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            current: self.current_card().cloned(),
            is_revealed: self.is_revealed,
            is_complete: self.is_complete,
            direction: self.direction,
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
            remaining: self.remaining_count(),
            total: self.total(),
            position: self.cursor,
        }
    }
}

impl std::fmt::Debug for DeckEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckEngine")
            .field("all_cards_len", &self.all_cards.len())
            .field("deck_len", &self.deck.len())
            .field("history_len", &self.history.len())
            .field("cursor", &self.cursor)
            .field("is_revealed", &self.is_revealed)
            .field("is_complete", &self.is_complete)
            .field("direction", &self.direction)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CardId;
    use std::collections::HashSet;

    fn build_card(id: u64) -> Card {
        Card::new(
            CardId::new(id),
            "Civics",
            format!("Q{id}"),
            vec![format!("A{id}")],
        )
    }

    fn build_bank(n: u64) -> CardBank {
        (1..=n).map(build_card).collect()
    }

    fn build_engine(n: u64, seed: u64) -> DeckEngine {
        let mut engine = DeckEngine::new(DeckSettings::default()).with_seed(seed);
        engine.initialize(build_bank(n));
        engine
    }

    fn current_id(engine: &DeckEngine) -> Option<u64> {
        engine.current_card().map(|c| c.id().value())
    }

    fn assert_invariants(engine: &DeckEngine) {
        let total = engine.all_cards.len();
        assert_eq!(engine.deck.len() + engine.history.len(), total);
        if let Some(c) = engine.cursor {
            assert!(c < engine.history.len());
        } else {
            assert!(engine.history.is_empty());
        }
        let unique: HashSet<&Card> = engine.history.iter().collect();
        assert_eq!(unique.len(), engine.history.len());
        if engine.is_complete {
            assert!(engine.deck.is_empty());
            let tail = Some(engine.history.len()).filter(|l| *l > 0);
            assert_eq!(engine.cursor.map(|c| c + 1), tail);
            assert!(engine.current_card().is_none());
        }
    }

    #[test]
    fn visits_every_card_exactly_once() {
        for seed in 0..20 {
            let mut engine = build_engine(12, seed);
            let mut seen = Vec::new();
            while let Some(card) = engine.current_card() {
                seen.push(card.clone());
                engine.advance();
                assert_invariants(&engine);
            }

            assert!(engine.is_complete());
            let unique: HashSet<Card> = seen.iter().cloned().collect();
            assert_eq!(seen.len(), 12);
            assert_eq!(unique, build_bank(12).into_iter().collect());
        }
    }

    #[test]
    fn draws_from_tail_of_shuffle() {
        let bank = build_bank(8);
        let mut expected = bank.clone();
        expected.shuffle(&mut StdRng::seed_from_u64(7));
        expected.reverse();

        let mut engine = DeckEngine::new(DeckSettings::default()).with_seed(7);
        engine.initialize(bank);

        let mut visited = Vec::new();
        while let Some(card) = engine.current_card() {
            visited.push(card.clone());
            engine.advance();
        }
        assert_eq!(visited, expected);
    }

    #[test]
    fn three_card_scenario_completes_on_fourth_advance() {
        let mut engine = build_engine(3, 1);
        assert!(current_id(&engine).is_some());
        engine.advance();
        engine.advance();
        assert!(!engine.is_complete());
        assert_eq!(engine.remaining_count(), 1);

        engine.advance();
        assert!(engine.is_complete());
        assert!(engine.current_card().is_none());
        assert_eq!(engine.remaining_count(), 0);
        assert_eq!(engine.pending_reveal(), None);
        assert_invariants(&engine);
    }

    #[test]
    fn retreat_then_advance_replays_history() {
        let mut engine = build_engine(5, 3);
        let a = current_id(&engine);
        engine.advance();
        let b = current_id(&engine);
        engine.advance();
        let c = current_id(&engine);
        assert_eq!(engine.pending_deck().len(), 2);

        engine.retreat();
        assert_eq!(current_id(&engine), b);
        assert_eq!(engine.direction(), Direction::Backward);
        assert!(engine.can_go_forward());

        engine.retreat();
        assert_eq!(current_id(&engine), a);
        assert!(!engine.can_go_back());

        engine.advance();
        assert_eq!(current_id(&engine), b);
        engine.advance();
        assert_eq!(current_id(&engine), c);
        assert_eq!(engine.pending_deck().len(), 2);
        assert_eq!(engine.direction(), Direction::Forward);

        engine.advance();
        assert_eq!(engine.pending_deck().len(), 1);
        assert_eq!(engine.history().len(), 4);
        assert_invariants(&engine);
    }

    #[test]
    fn retreat_on_first_card_is_noop() {
        let mut engine = build_engine(3, 9);
        let first = current_id(&engine);
        let token = engine.pending_reveal();
        engine.toggle_reveal();

        engine.retreat();
        assert_eq!(current_id(&engine), first);
        assert!(engine.is_revealed());
        assert_eq!(engine.direction(), Direction::Forward);
        assert_ne!(engine.pending_reveal(), token);
    }

    #[test]
    fn navigation_hides_answers() {
        let mut engine = build_engine(3, 2);
        engine.toggle_reveal();
        assert!(engine.is_revealed());
        engine.advance();
        assert!(!engine.is_revealed());

        engine.toggle_reveal();
        engine.retreat();
        assert!(!engine.is_revealed());
    }

    #[test]
    fn retreat_restarts_the_countdown() {
        let mut engine = build_engine(3, 10);
        engine.advance();
        let before = engine.pending_reveal().expect("timer scheduled");

        engine.retreat();
        let after = engine.pending_reveal().expect("timer rescheduled");
        assert_ne!(before, after);
        assert!(!engine.fire_reveal(before));
        assert!(!engine.is_revealed());

        assert!(engine.fire_reveal(after));
        assert!(engine.is_revealed());
    }

    #[test]
    fn toggle_without_card_is_noop() {
        let mut engine = build_engine(1, 14);
        engine.advance();
        assert!(engine.is_complete());

        engine.toggle_reveal();
        assert!(!engine.is_revealed());
        assert!(engine.is_complete());
        assert!(engine.current_card().is_none());

        let mut empty = DeckEngine::new(DeckSettings::default());
        empty.initialize(build_bank(0));
        empty.toggle_reveal();
        assert!(!empty.is_revealed());
    }

    #[test]
    fn toggle_on_revealed_card_advances() {
        let mut engine = build_engine(3, 4);
        let first = current_id(&engine);
        engine.toggle_reveal();
        engine.toggle_reveal();
        assert_ne!(current_id(&engine), first);
        assert!(!engine.is_revealed());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn manual_reveal_cancels_timer() {
        let mut engine = build_engine(3, 5);
        let token = engine.pending_reveal().expect("timer scheduled");
        engine.toggle_reveal();
        assert_eq!(engine.pending_reveal(), None);
        assert!(!engine.fire_reveal(token));
        assert!(engine.is_revealed());
    }

    #[test]
    fn timer_fire_reveals_current_card() {
        let mut engine = build_engine(3, 6);
        let token = engine.pending_reveal().unwrap();
        assert!(engine.fire_reveal(token));
        assert!(engine.is_revealed());
        assert_eq!(engine.pending_reveal(), None);
    }

    #[test]
    fn stale_fire_after_navigation_is_ignored() {
        let mut engine = build_engine(3, 8);
        let stale = engine.pending_reveal().unwrap();
        engine.advance();
        let fresh = engine.pending_reveal().unwrap();

        assert_ne!(stale, fresh);
        assert!(!engine.fire_reveal(stale));
        assert!(!engine.is_revealed());
        assert_eq!(engine.pending_reveal(), Some(fresh));
    }

    #[test]
    fn disabled_auto_reveal_schedules_nothing() {
        let settings = DeckSettings::new(false, 30).unwrap();
        let mut engine = DeckEngine::new(settings).with_seed(1);
        engine.initialize(build_bank(2));
        assert_eq!(engine.pending_reveal(), None);
        engine.advance();
        assert_eq!(engine.pending_reveal(), None);
    }

    #[test]
    fn disabling_auto_reveal_cancels_pending() {
        let mut engine = build_engine(2, 1);
        assert!(engine.pending_reveal().is_some());
        engine.set_settings(DeckSettings::new(false, 30).unwrap());
        assert_eq!(engine.pending_reveal(), None);
    }

    #[test]
    fn reset_reshuffles_and_clears_history() {
        let mut engine = build_engine(4, 11);
        while !engine.is_complete() {
            engine.advance();
        }
        engine.reset_deck();

        assert!(!engine.is_complete());
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.cursor(), Some(0));
        assert_eq!(engine.remaining_count(), 4);
        assert!(engine.pending_reveal().is_some());
        assert_invariants(&engine);
    }

    #[test]
    fn retreat_from_completion_shows_history() {
        let mut engine = build_engine(3, 12);
        while !engine.is_complete() {
            engine.advance();
        }
        engine.retreat();
        assert!(!engine.is_complete());
        assert_eq!(engine.cursor(), Some(1));
        assert_eq!(current_id(&engine), Some(engine.history()[1].id().value()));

        engine.advance();
        engine.advance();
        assert!(engine.is_complete());
        assert_invariants(&engine);
    }

    #[test]
    fn empty_bank_is_complete_but_distinct_from_not_loaded() {
        let mut engine = DeckEngine::new(DeckSettings::default());
        assert_eq!(engine.total(), DeckTotal::NotLoaded);
        assert_eq!(engine.total_count(), None);

        engine.initialize(Vec::new());
        assert!(engine.is_complete());
        assert!(engine.current_card().is_none());
        assert_eq!(engine.total(), DeckTotal::Empty);
        assert_eq!(engine.total_count(), None);
        assert_eq!(engine.remaining_count(), 0);
        assert_eq!(engine.pending_reveal(), None);
        assert_invariants(&engine);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut engine = build_engine(3, 13);
        engine.advance();
        let snap = engine.snapshot();

        assert_eq!(
            snap.current.as_ref().map(Card::id),
            engine.current_card().map(Card::id)
        );
        assert_eq!(snap.total, DeckTotal::Loaded(3));
        assert_eq!(snap.position, Some(1));
        assert!(snap.can_go_back);
        assert!(!snap.can_go_forward);
        assert_eq!(snap.remaining, 2);
        assert!(!snap.is_revealed);
    }
}
