#![forbid(unsafe_code)]

pub mod card_source;
pub mod deck;
pub mod model;

pub use card_source::load_cards;
pub use deck::{DeckEngine, DeckSnapshot, DeckTotal, Direction};
