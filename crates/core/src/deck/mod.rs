mod engine;
mod timer;

pub use engine::{DeckEngine, DeckSnapshot, DeckTotal, Direction};
pub use timer::{ManualScheduler, RevealScheduler, RevealTimer, TimerToken};
