use std::fmt::Write as _;

use flash_core::{DeckSnapshot, DeckTotal};

pub const HELP: &str = "commands: n/next  p/prev  r/reveal  s/shuffle  l/reload  q/quit";

/// Text shown for one engine snapshot.
pub fn render(snap: &DeckSnapshot) -> String {
    let mut out = String::new();

    let total = match snap.total {
        DeckTotal::NotLoaded => {
            out.push_str("Loading questions...\n");
            return out;
        }
        DeckTotal::Empty => {
            out.push_str("No questions available. Check the question bank path.\n");
            return out;
        }
        DeckTotal::Loaded(n) => n,
    };

    let Some(card) = snap.current.as_ref() else {
        out.push_str("Deck complete. Press s to shuffle again, or p to go back.\n");
        return out;
    };

    let position = snap.position.map_or(0, |p| p + 1);
    let _ = writeln!(out, "[{position}/{total}] {}", card.category());
    let _ = writeln!(out, "Q: {}", card.question());
    if snap.is_revealed {
        for answer in card.answers() {
            let _ = writeln!(out, "  - {answer}");
        }
    } else {
        out.push_str("  (press r to reveal)\n");
    }
    let _ = writeln!(out, "{} remaining", snap.remaining);
    out
}
