use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use flash_core::model::RawBank;

use crate::repository::{QuestionBankSource, StorageError};

/// Question bank read from a JSON file on every load.
#[derive(Debug, Clone)]
pub struct JsonFileQuestionBank {
    path: PathBuf,
}

impl JsonFileQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionBankSource for JsonFileQuestionBank {
    async fn load_raw_bank(&self) -> Result<RawBank, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => {
                    StorageError::Unavailable(format!("{} not found", self.path.display()))
                }
                _ => StorageError::Unavailable(err.to_string()),
            })?;
        let bank = parse_raw_bank(&raw)?;
        log::debug!(
            "loaded {} questions from {}",
            bank.question_count(),
            self.path.display()
        );
        Ok(bank)
    }
}

/// Parse the question bank JSON format.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the text is not a valid bank.
pub fn parse_raw_bank(raw: &str) -> Result<RawBank, StorageError> {
    serde_json::from_str(raw).map_err(|err| StorageError::Serialization(err.to_string()))
}
