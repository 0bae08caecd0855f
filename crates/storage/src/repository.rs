use async_trait::async_trait;
use flash_core::model::RawBank;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value settings store the override fields are read from.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the store cannot be read. A missing key is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Supplier of the raw, nested question bank.
#[async_trait]
pub trait QuestionBankSource: Send + Sync {
    /// Load and parse the question bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the source is missing, or
    /// `StorageError::Serialization` if it cannot be parsed.
    async fn load_raw_bank(&self) -> Result<RawBank, StorageError>;
}

/// Simple in-memory settings store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemorySettingsStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// In-memory question bank. `None` behaves like an unavailable source.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    bank: Arc<Mutex<Option<RawBank>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(bank: Option<RawBank>) -> Self {
        Self {
            bank: Arc::new(Mutex::new(bank)),
        }
    }

    /// Swap the bank served by subsequent loads.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn replace(&self, bank: Option<RawBank>) -> Result<(), StorageError> {
        let mut guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = bank;
        Ok(())
    }
}

#[async_trait]
impl QuestionBankSource for InMemoryQuestionBank {
    async fn load_raw_bank(&self) -> Result<RawBank, StorageError> {
        let guard = self
            .bank
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .clone()
            .ok_or_else(|| StorageError::Unavailable("no question bank loaded".into()))
    }
}

/// Aggregates the external collaborators behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub settings: Arc<dyn SettingsStore>,
    pub questions: Arc<dyn QuestionBankSource>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(bank: Option<RawBank>) -> Self {
        let settings: Arc<dyn SettingsStore> = Arc::new(InMemorySettingsStore::new());
        let questions: Arc<dyn QuestionBankSource> = Arc::new(InMemoryQuestionBank::new(bank));
        Self {
            settings,
            questions,
        }
    }
}
