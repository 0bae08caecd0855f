use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckSettingsError {
    #[error("auto reveal seconds must be between {min} and {max}")]
    InvalidAutoRevealSeconds { min: u32, max: u32 },
}

/// Tunables for a deck session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSettings {
    auto_reveal_enabled: bool,
    auto_reveal_secs: u32,
}

impl DeckSettings {
    pub const MIN_AUTO_REVEAL_SECS: u32 = 5;
    pub const MAX_AUTO_REVEAL_SECS: u32 = 600;
    pub const DEFAULT_AUTO_REVEAL_SECS: u32 = 30;

    /// Creates custom deck settings.
    ///
    /// # Errors
    ///
    /// Returns `DeckSettingsError::InvalidAutoRevealSeconds` if the delay is
    /// outside 5..=600 seconds.
    pub fn new(
        auto_reveal_enabled: bool,
        auto_reveal_secs: u32,
    ) -> Result<Self, DeckSettingsError> {
        if !(Self::MIN_AUTO_REVEAL_SECS..=Self::MAX_AUTO_REVEAL_SECS).contains(&auto_reveal_secs) {
            return Err(DeckSettingsError::InvalidAutoRevealSeconds {
                min: Self::MIN_AUTO_REVEAL_SECS,
                max: Self::MAX_AUTO_REVEAL_SECS,
            });
        }
        Ok(Self {
            auto_reveal_enabled,
            auto_reveal_secs,
        })
    }

    #[must_use]
    pub fn auto_reveal_enabled(&self) -> bool {
        self.auto_reveal_enabled
    }

    #[must_use]
    pub fn auto_reveal_secs(&self) -> u32 {
        self.auto_reveal_secs
    }

    /// Delay before an unrevealed card is revealed, or `None` when disabled.
    #[must_use]
    pub fn auto_reveal_delay(&self) -> Option<Duration> {
        self.auto_reveal_enabled
            .then(|| Duration::from_secs(u64::from(self.auto_reveal_secs)))
    }
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            auto_reveal_enabled: true,
            auto_reveal_secs: Self::DEFAULT_AUTO_REVEAL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reveals_after_thirty_seconds() {
        let settings = DeckSettings::default();
        assert_eq!(settings.auto_reveal_delay(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn rejects_out_of_range_delay() {
        assert!(DeckSettings::new(true, 4).is_err());
        assert!(DeckSettings::new(true, 601).is_err());
        assert!(DeckSettings::new(true, 5).is_ok());
    }

    #[test]
    fn disabled_has_no_delay() {
        let settings = DeckSettings::new(false, 30).unwrap();
        assert_eq!(settings.auto_reveal_delay(), None);
    }
}
