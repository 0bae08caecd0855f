#![forbid(unsafe_code)]

pub mod card_source;
pub mod driver;
pub mod error;
pub mod override_resolver;

pub use card_source::CardSourceService;
pub use driver::{DeckDriver, DeckHandle};
pub use error::{DriverError, OverrideError};
pub use override_resolver::OverrideResolver;
