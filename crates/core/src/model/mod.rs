mod card;
mod ids;
mod overrides;
mod raw;
mod settings;

pub use card::{Card, CardBank};
pub use ids::CardId;
pub use overrides::{
    OverrideField, Overrides, UnknownOverrideField, VARY_BY_LOCATION_PLACEHOLDER,
    is_override_eligible,
};
pub use raw::{RawBank, RawCategory, RawQuestion};
pub use settings::{DeckSettings, DeckSettingsError};
