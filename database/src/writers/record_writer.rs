use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use types::{NewGameRecord, ValidationError};

use crate::{DatabaseError, RecordStore};

/// The store rejected or failed an append. Never retried.
#[derive(Error, Debug)]
#[error("Error saving game data")]
pub struct PersistenceError {
    #[source]
    source: DatabaseError,
}

impl PersistenceError {
    pub fn new(source: DatabaseError) -> Self {
        Self { source }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn detail(&self) -> &DatabaseError {
        &self.source
    }
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveReceipt {
    pub stored: bool,
}

/// Validates and appends finished games.
pub struct RecordWriter<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for RecordWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore + ?Sized> RecordWriter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores one outcome. Nothing reaches the store unless every required
    /// field is present, and each successful call appends exactly one record.
    #[tracing::instrument(skip_all)]
    pub async fn save(&self, candidate: NewGameRecord) -> Result<SaveReceipt, WriteError> {
        tracing::info!(?candidate, "received game data to save");

        let outcome = candidate.validate().map_err(|error| {
            tracing::warn!(%error, "rejected game data");
            error
        })?;

        if !outcome.difficulty.is_known() {
            tracing::debug!(difficulty = %outcome.difficulty, "storing unrecognised difficulty label");
        }

        let record = self.store.insert_record(&outcome).await.map_err(|error| {
            tracing::error!(%error, player = %outcome.player_ref, "error saving game data");
            PersistenceError::new(error)
        })?;

        tracing::info!(record_id = record.id, player = %record.player_ref, "game data saved");
        Ok(SaveReceipt { stored: true })
    }
}
