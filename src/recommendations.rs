//! Persists the outcome of a matching pass as a ranked recommendation log.

use crate::matching::MatchResult;
use crate::store::{RecommendationEntry, RecordStore, StoreError};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Appends ranked match batches to the recommendation log.
///
/// The log is append-only batch history: recording the same batch twice
/// writes duplicate rows. That is accepted semantics, not deduplicated here.
pub struct RecommendationRecorder {
    store: Arc<RecordStore>,
}

impl RecommendationRecorder {
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self { store }
    }

    /// Records `matches` for `profile_id`, ranking 1-based by input order
    /// (callers pass the already score-descending shortlist). No-op on an
    /// empty batch.
    pub fn record(&self, profile_id: &str, matches: &[MatchResult]) -> Result<(), StoreError> {
        if matches.is_empty() {
            return Ok(());
        }

        let matched_on = Utc::now().to_rfc3339();
        let rows: Vec<RecommendationEntry> = matches
            .iter()
            .enumerate()
            .map(|(index, result)| RecommendationEntry {
                id: Uuid::new_v4().to_string(),
                profile_id: profile_id.to_string(),
                scholarship_id: result.scholarship_id.clone(),
                score: result.score,
                rank: index as u32 + 1,
                matched_on: matched_on.clone(),
                reasoning: result.reasoning(),
                sent_to_user: false,
                user_feedback: String::new(),
            })
            .collect();

        let recorded = rows.len();
        self.store.append_recommendations(rows)?;
        info!(profile_id, recorded, "recommendation batch persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ScoreBreakdown;

    fn result(id: &str, score: u16) -> MatchResult {
        MatchResult {
            scholarship_id: id.to_string(),
            scholarship_name: format!("Scholarship {id}"),
            country: "UK".to_string(),
            funding_type: "Fully Funded".to_string(),
            deadline: "Open".to_string(),
            score,
            breakdown: ScoreBreakdown::default(),
            reasons: vec!["Degree Match".to_string()],
            eligible: true,
            issues: Vec::new(),
        }
    }

    #[test]
    fn batches_rank_by_input_order() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(RecordStore::load(dir.path()));
        let recorder = RecommendationRecorder::new(store.clone());

        recorder
            .record("P001", &[result("SCH-002", 95), result("SCH-001", 80)])
            .expect("batch records");

        let rows = store.recommendations();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].scholarship_id, "SCH-002");
        assert_eq!(rows[0].rank, 1);
        assert_eq!(rows[1].rank, 2);
        assert!(!rows[0].sent_to_user);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn empty_batch_writes_nothing() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(RecordStore::load(dir.path()));
        let recorder = RecommendationRecorder::new(store.clone());

        recorder.record("P001", &[]).expect("no-op succeeds");
        assert!(store.recommendations().is_empty());
        assert!(!dir.path().join("recommendations.csv").exists());
    }

    #[test]
    fn repeated_batches_append_duplicate_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(RecordStore::load(dir.path()));
        let recorder = RecommendationRecorder::new(store.clone());
        let batch = [result("SCH-001", 80)];

        recorder.record("P001", &batch).expect("first batch");
        recorder.record("P001", &batch).expect("second batch");

        assert_eq!(store.recommendations().len(), 2);
    }
}
