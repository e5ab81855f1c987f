//! Application tracking: idempotent creation, catalog-joined listings, and
//! unrestricted status transitions over persisted application records.

use crate::store::{ApplicationRecord, ApplicationStatus, Mutation, RecordStore, StoreError};
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service owning the lifecycle of a student's tracked applications.
pub struct ApplicationTracker {
    store: Arc<RecordStore>,
}

/// Result of asking to track a (profile, scholarship) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    Created,
    AlreadyTracked,
}

impl TrackOutcome {
    pub const fn message(self) -> &'static str {
        match self {
            TrackOutcome::Created => "Scholarship added to your tracker successfully.",
            TrackOutcome::AlreadyTracked => "Already added to your tracker.",
        }
    }
}

/// An application joined with catalog metadata for display.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub application_id: String,
    pub scholarship_id: String,
    pub scholarship_name: String,
    pub country: String,
    pub status: &'static str,
    pub applied_on: String,
    pub notes: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("application not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApplicationTracker {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Tracks a scholarship for a profile, creating the record only when the
    /// pair is new. Safe to call repeatedly: the second call reports
    /// [`TrackOutcome::AlreadyTracked`] and mutates nothing.
    pub fn add(&self, profile_id: &str, scholarship_id: &str) -> Result<TrackOutcome, TrackerError> {
        let profile_id = profile_id.trim().to_string();
        let scholarship_id = scholarship_id.trim().to_string();

        let outcome = self.store.update_applications(|records| {
            let exists = records.iter().any(|record| {
                record.profile_id == profile_id && record.scholarship_id == scholarship_id
            });
            if exists {
                return Mutation::Unchanged(TrackOutcome::AlreadyTracked);
            }

            records.push(ApplicationRecord {
                id: Uuid::new_v4().to_string(),
                profile_id: profile_id.clone(),
                scholarship_id: scholarship_id.clone(),
                status: ApplicationStatus::Interested,
                // Provisional stamp; refreshed when the status becomes Applied.
                applied_on: today(),
                notes: String::new(),
            });
            Mutation::Changed(TrackOutcome::Created)
        })?;

        if outcome == TrackOutcome::Created {
            info!(%profile_id, %scholarship_id, "application tracked");
        }
        Ok(outcome)
    }

    /// Lists a profile's applications, left-joined against the scholarship
    /// catalog. A scholarship missing from the catalog degrades to "Unknown"
    /// display fields rather than failing the listing.
    pub fn list(&self, profile_id: &str) -> Vec<ApplicationView> {
        let profile_id = profile_id.trim();
        let catalog = self.store.scholarships();

        self.store
            .applications()
            .into_iter()
            .filter(|record| record.profile_id == profile_id)
            .map(|record| {
                let scholarship = catalog
                    .iter()
                    .find(|scholarship| scholarship.id == record.scholarship_id);
                ApplicationView {
                    application_id: record.id,
                    scholarship_id: record.scholarship_id,
                    scholarship_name: scholarship
                        .map(|s| s.name.clone())
                        .unwrap_or_else(|| "Unknown Scholarship".to_string()),
                    country: scholarship
                        .map(|s| s.country.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    status: record.status.label(),
                    applied_on: record.applied_on,
                    notes: record.notes,
                }
            })
            .collect()
    }

    /// Updates status and notes in place. Any transition is legal, including
    /// reversals like Rejected back to Applied; entering `Applied` re-stamps
    /// `applied_on` with today's date.
    pub fn update(
        &self,
        application_id: &str,
        status: ApplicationStatus,
        notes: &str,
    ) -> Result<(), TrackerError> {
        self.store.update_applications(|records| {
            let Some(record) = records
                .iter_mut()
                .find(|record| record.id == application_id)
            else {
                return Mutation::Unchanged(Err(TrackerError::NotFound));
            };

            record.status = status;
            record.notes = notes.to_string();
            if status == ApplicationStatus::Applied {
                record.applied_on = today();
            }
            Mutation::Changed(Ok(()))
        })?
    }
}

fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> (tempfile::TempDir, Arc<RecordStore>, ApplicationTracker) {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(RecordStore::load(dir.path()));
        let tracker = ApplicationTracker::new(store.clone());
        (dir, store, tracker)
    }

    #[test]
    fn add_is_idempotent_per_pair() {
        let (_dir, store, tracker) = tracker();

        let first = tracker.add("P001", "SCH-001").expect("first add");
        let second = tracker.add("P001", "SCH-001").expect("second add");

        assert_eq!(first, TrackOutcome::Created);
        assert_eq!(second, TrackOutcome::AlreadyTracked);
        assert_eq!(store.applications().len(), 1);
    }

    #[test]
    fn listing_falls_back_when_catalog_entry_is_missing() {
        let (_dir, _store, tracker) = tracker();
        tracker.add("P001", "SCH-GONE").expect("add succeeds");

        let views = tracker.list("P001");
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].scholarship_name, "Unknown Scholarship");
        assert_eq!(views[0].country, "Unknown");
        assert_eq!(views[0].status, "Interested");
    }

    #[test]
    fn update_of_missing_id_is_not_found() {
        let (_dir, store, tracker) = tracker();
        tracker.add("P001", "SCH-001").expect("add succeeds");

        let err = tracker
            .update("does-not-exist", ApplicationStatus::Applied, "")
            .expect_err("missing id rejected");
        assert!(matches!(err, TrackerError::NotFound));
        assert_eq!(store.applications()[0].status, ApplicationStatus::Interested);
    }
}
