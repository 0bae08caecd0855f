use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::ids::CardId;

/// Placeholder answer for location-dependent questions without a user override.
pub const VARY_BY_LOCATION_PLACEHOLDER: &str =
    "Answers will vary by location. Please add via settings.";

/// User-editable setting that replaces the answer of one location-dependent card.
///
/// The id mapping is fixed: senator → 23, representative → 29, governor → 61,
/// capital → 62.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverrideField {
    Senator,
    Representative,
    Governor,
    Capital,
}

impl OverrideField {
    pub const ALL: [OverrideField; 4] = [
        OverrideField::Governor,
        OverrideField::Capital,
        OverrideField::Senator,
        OverrideField::Representative,
    ];

    /// Settings store key for this field.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            OverrideField::Senator => "senator",
            OverrideField::Representative => "representative",
            OverrideField::Governor => "governor",
            OverrideField::Capital => "capital",
        }
    }

    /// Card whose answers this field overrides.
    #[must_use]
    pub fn card_id(self) -> CardId {
        match self {
            OverrideField::Senator => CardId::new(23),
            OverrideField::Representative => CardId::new(29),
            OverrideField::Governor => CardId::new(61),
            OverrideField::Capital => CardId::new(62),
        }
    }

    /// Looks up the field that owns the given card, if any.
    #[must_use]
    pub fn for_card(id: CardId) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.card_id() == id)
    }
}

impl fmt::Display for OverrideField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown override field: {0}")]
pub struct UnknownOverrideField(pub String);

impl FromStr for OverrideField {
    type Err = UnknownOverrideField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == needle)
            .ok_or_else(|| UnknownOverrideField(s.to_owned()))
    }
}

/// Returns true if the card's answers are always replaced (by an override or the placeholder).
#[must_use]
pub fn is_override_eligible(id: CardId) -> bool {
    OverrideField::for_card(id).is_some()
}

/// Resolved user overrides keyed by card id.
///
/// Values are trimmed on insert; blank values are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: HashMap<CardId, String>,
}

impl Overrides {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value for `field`. Returns false if the value was blank and ignored.
    pub fn insert(&mut self, field: OverrideField, value: &str) -> bool {
        match normalize(value) {
            Some(value) => {
                self.values.insert(field.card_id(), value);
                true
            }
            None => {
                self.values.remove(&field.card_id());
                false
            }
        }
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&str> {
        self.values.get(&id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
