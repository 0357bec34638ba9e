//! Participant data records and where they come from.
//!
//! A record is a flat key→string map (name, email, university...). The
//! export pipeline only ever sees a record; how one is looked up for a
//! registration id is the business of a [`ParticipantSource`].

use crate::error::ParticipantError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantRecord(BTreeMap<String, String>);

impl ParticipantRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value for `key`; blank values count as missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn from_json(json: &str) -> Result<Self, ParticipantError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ParticipantError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParticipantRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Resolves a registration id to the participant's record.
#[async_trait]
pub trait ParticipantSource: Send + Sync {
    async fn participant(&self, registration_id: &str) -> Result<ParticipantRecord, ParticipantError>;
}

/// Map-backed source.
#[derive(Debug, Clone, Default)]
pub struct StaticParticipants {
    records: HashMap<String, ParticipantRecord>,
}

impl StaticParticipants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, registration_id: impl Into<String>, record: ParticipantRecord) -> Self {
        self.records.insert(registration_id.into(), record);
        self
    }
}

#[async_trait]
impl ParticipantSource for StaticParticipants {
    async fn participant(&self, registration_id: &str) -> Result<ParticipantRecord, ParticipantError> {
        self.records
            .get(registration_id)
            .cloned()
            .ok_or_else(|| ParticipantError::UnknownRegistration(registration_id.to_string()))
    }
}
