//! Entity persistence for features and gates.
//!
//! The gateway reads features and gates and writes back a single field on
//! features. [`MemoryStore`] is an in-process registry, optionally seeded
//! from a JSON file at startup.

use std::{collections::HashMap, path::Path, sync::RwLock};

use async_trait::async_trait;
use launch_core::{Feature, FeatureId, Gate, GateId};
use serde::Deserialize;

/// Errors raised by an [`EntityStore`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// A previous writer panicked while holding the lock.
    #[error("store lock poisoned")]
    Poisoned,

    /// The seed file could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid seed JSON.
    #[error("invalid seed data: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Lookup and persistence of the entities the gateway touches.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Load a feature by ID. `Ok(None)` if it does not exist.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backend fails.
    async fn get_feature(&self, id: FeatureId) -> Result<Option<Feature>, StoreError>;

    /// Load a gate by ID. `Ok(None)` if it does not exist.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backend fails.
    async fn get_gate(&self, id: GateId) -> Result<Option<Gate>, StoreError>;

    /// Persist a feature, replacing any stored copy with the same ID.
    ///
    /// # Errors
    /// Returns a [`StoreError`] if the backend fails.
    async fn put_feature(&self, feature: &Feature) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    features: Vec<Feature>,
    #[serde(default)]
    gates: Vec<Gate>,
}

/// Thread-safe in-memory entity registry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    features: RwLock<HashMap<FeatureId, Feature>>,
    gates: RwLock<HashMap<GateId, Gate>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed JSON of the form
    /// `{"features": [...], "gates": [...]}`.
    ///
    /// # Errors
    /// Returns [`StoreError::Seed`] if the JSON does not match.
    pub fn from_seed_json(raw: &str) -> Result<Self, StoreError> {
        let seed: Seed = serde_json::from_str(raw)?;
        let store = Self::new();
        for feature in seed.features {
            store.insert_feature(feature)?;
        }
        for gate in seed.gates {
            store.insert_gate(gate)?;
        }
        Ok(store)
    }

    /// Build a store from a seed file. See [`MemoryStore::from_seed_json`].
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::Seed`] if its content is invalid.
    pub fn from_seed_file(path: &Path) -> Result<Self, StoreError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_seed_json(&raw)
    }

    /// Insert or replace a feature.
    ///
    /// # Errors
    /// Returns [`StoreError::Poisoned`] if the lock is poisoned.
    pub fn insert_feature(&self, feature: Feature) -> Result<(), StoreError> {
        self.features
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(feature.id, feature);
        Ok(())
    }

    /// Insert or replace a gate.
    ///
    /// # Errors
    /// Returns [`StoreError::Poisoned`] if the lock is poisoned.
    pub fn insert_gate(&self, gate: Gate) -> Result<(), StoreError> {
        self.gates
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(gate.id, gate);
        Ok(())
    }

    /// Number of stored features and gates.
    ///
    /// # Errors
    /// Returns [`StoreError::Poisoned`] if a lock is poisoned.
    pub fn len(&self) -> Result<(usize, usize), StoreError> {
        let features = self.features.read().map_err(|_| StoreError::Poisoned)?.len();
        let gates = self.gates.read().map_err(|_| StoreError::Poisoned)?.len();
        Ok((features, gates))
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn get_feature(&self, id: FeatureId) -> Result<Option<Feature>, StoreError> {
        let features = self.features.read().map_err(|_| StoreError::Poisoned)?;
        Ok(features.get(&id).cloned())
    }

    async fn get_gate(&self, id: GateId) -> Result<Option<Gate>, StoreError> {
        let gates = self.gates.read().map_err(|_| StoreError::Poisoned)?;
        Ok(gates.get(&id).cloned())
    }

    async fn put_feature(&self, feature: &Feature) -> Result<(), StoreError> {
        self.insert_feature(feature.clone())
    }
}
