//! CSV-backed record store owning the named collections the core operates on.
//!
//! Storage semantics are deliberately coarse: each collection supports "load
//! all" at startup and "replace all" on every mutation, with writers to a
//! collection serialized behind its lock. A missing or unreadable file is
//! recovered as an empty collection with a warning so one broken export never
//! takes the whole service down.

mod models;

pub use models::{
    AgentRecord, ApplicationRecord, ApplicationStatus, PrepQuestion, RecommendationEntry,
    ScholarshipRecord, StudentProfile,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::warn;

const SCHOLARSHIPS: &str = "scholarships";
const RECOMMENDATIONS: &str = "recommendations";
const APPLICATIONS: &str = "applications";
const AGENTS: &str = "agents";
const INTERVIEW_PREP: &str = "interview_prep";

/// Process-wide owner of the record collections. Constructed once at startup
/// and handed to each component by reference; there is no ambient singleton.
pub struct RecordStore {
    data_dir: PathBuf,
    scholarships: RwLock<Vec<ScholarshipRecord>>,
    recommendations: RwLock<Vec<RecommendationEntry>>,
    applications: RwLock<Vec<ApplicationRecord>>,
    agents: RwLock<Vec<AgentRecord>>,
    prep: RwLock<Vec<PrepQuestion>>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to persist collection '{collection}': {source}")]
    Persist {
        collection: &'static str,
        #[source]
        source: csv::Error,
    },
    #[error("failed to flush collection '{collection}': {source}")]
    Flush {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl RecordStore {
    /// Loads every collection from `data_dir`, one CSV file per collection.
    pub fn load(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            scholarships: RwLock::new(load_collection(&data_dir, SCHOLARSHIPS)),
            recommendations: RwLock::new(load_collection(&data_dir, RECOMMENDATIONS)),
            applications: RwLock::new(load_collection(&data_dir, APPLICATIONS)),
            agents: RwLock::new(load_collection(&data_dir, AGENTS)),
            prep: RwLock::new(load_collection(&data_dir, INTERVIEW_PREP)),
            data_dir,
        }
    }

    pub fn scholarships(&self) -> Vec<ScholarshipRecord> {
        read_snapshot(&self.scholarships)
    }

    pub fn applications(&self) -> Vec<ApplicationRecord> {
        read_snapshot(&self.applications)
    }

    pub fn recommendations(&self) -> Vec<RecommendationEntry> {
        read_snapshot(&self.recommendations)
    }

    pub fn agents(&self) -> Vec<AgentRecord> {
        read_snapshot(&self.agents)
    }

    pub fn prep_questions(&self) -> Vec<PrepQuestion> {
        read_snapshot(&self.prep)
    }

    /// Appends rows to the recommendation log and flushes the collection.
    /// Existing entries are never rewritten.
    pub fn append_recommendations(
        &self,
        rows: Vec<RecommendationEntry>,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .recommendations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.extend(rows);
        persist(&self.data_dir, RECOMMENDATIONS, &guard)
    }

    /// Runs `mutate` against the application collection under its write lock
    /// and flushes the full collection afterwards when the closure reports a
    /// change. The lock is the single-writer boundary per collection.
    pub fn update_applications<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<ApplicationRecord>) -> Mutation<T>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .applications
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match mutate(&mut guard) {
            Mutation::Changed(value) => {
                persist(&self.data_dir, APPLICATIONS, &guard)?;
                Ok(value)
            }
            Mutation::Unchanged(value) => Ok(value),
        }
    }
}

/// Outcome of a closure-driven collection update, so read-only lookups under
/// the write lock skip the file rewrite.
pub enum Mutation<T> {
    Changed(T),
    Unchanged(T),
}

fn read_snapshot<T: Clone>(lock: &RwLock<Vec<T>>) -> Vec<T> {
    lock.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn load_collection<T: DeserializeOwned>(data_dir: &Path, name: &str) -> Vec<T> {
    let path = data_dir.join(format!("{name}.csv"));
    if !path.exists() {
        warn!(collection = name, path = %path.display(), "collection file missing; starting empty");
        return Vec::new();
    }

    let mut reader = match csv::Reader::from_path(&path) {
        Ok(reader) => reader,
        Err(err) => {
            warn!(collection = name, error = %err, "collection unreadable; starting empty");
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            // One malformed row must not sink the rest of the collection.
            Err(err) => warn!(collection = name, error = %err, "skipping malformed row"),
        }
    }
    rows
}

fn persist<T: Serialize>(
    data_dir: &Path,
    name: &'static str,
    rows: &[T],
) -> Result<(), StoreError> {
    let path = data_dir.join(format!("{name}.csv"));
    let mut writer = csv::Writer::from_path(&path).map_err(|source| StoreError::Persist {
        collection: name,
        source,
    })?;

    for row in rows {
        writer
            .serialize(row)
            .map_err(|source| StoreError::Persist {
                collection: name,
                source,
            })?;
    }

    writer.flush().map_err(|source| StoreError::Flush {
        collection: name,
        source,
    })
}
