use flash_core::deck::TimerToken;
use flash_core::model::{CardBank, DeckSettings};
use flash_core::{DeckEngine, DeckSnapshot};
use tokio::sync::{mpsc, oneshot, watch};

pub(crate) enum Command {
    Advance,
    Retreat,
    ToggleReveal,
    Reset,
    Load(CardBank),
    Settings(DeckSettings),
    Snapshot(oneshot::Sender<DeckSnapshot>),
    RevealFired(TimerToken),
}

/// Owns the engine. Commands and timer fires are applied one at a time, in
/// arrival order, so a cancel always lands before any later fire is looked at.
pub(crate) async fn run(
    mut engine: DeckEngine,
    mut commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<DeckSnapshot>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Advance => {
                log::debug!("advance");
                engine.advance();
            }
            Command::Retreat => {
                log::debug!("retreat");
                engine.retreat();
            }
            Command::ToggleReveal => {
                log::debug!("toggle reveal");
                engine.toggle_reveal();
            }
            Command::Reset => {
                log::debug!("reset deck");
                engine.reset_deck();
            }
            Command::Load(bank) => {
                log::debug!("initialize with {} cards", bank.len());
                engine.initialize(bank);
            }
            Command::Settings(settings) => engine.set_settings(settings),
            Command::Snapshot(reply) => {
                let _ = reply.send(engine.snapshot());
            }
            Command::RevealFired(token) => {
                if engine.fire_reveal(token) {
                    log::debug!("auto reveal {} fired", token.value());
                } else {
                    log::warn!("ignoring stale auto reveal {}", token.value());
                }
            }
        }

        snapshots.send_if_modified(|published| {
            let next = engine.snapshot();
            if *published == next {
                false
            } else {
                *published = next;
                true
            }
        });
    }
    log::debug!("deck driver stopped");
}
