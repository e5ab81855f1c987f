//! Multi-criteria eligibility scoring for the scholarship catalog.
//!
//! One pass evaluates a single student profile against every catalog row and
//! produces two things: a ranked shortlist of explainable [`MatchResult`]s
//! and [`RejectionStats`] aggregated over the whole catalog so a thin or
//! empty shortlist can still be explained to the student.

pub mod report;
mod rules;

use crate::store::{ScholarshipRecord, StudentProfile};
use rules::ProfileSignals;
use serde::Serialize;

/// Tunables for a matching pass.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// How many results survive the ranking cut.
    pub shortlist_size: usize,
    /// Highest IELTS minimum still counted as a realistic retake target.
    pub attainable_ielts_band: f32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            shortlist_size: 10,
            attainable_ielts_band: 7.5,
        }
    }
}

/// Stateless evaluator applying the additive scoring rubric to a profile.
pub struct MatchEngine {
    config: MatchConfig,
}

impl MatchEngine {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Scores `catalog` for `student`.
    ///
    /// Results come back sorted by score descending with ties left in
    /// catalog order, truncated to the shortlist size. Rejection counters
    /// always cover the entire catalog, independent of the cut. An empty
    /// catalog yields an empty shortlist and all-zero stats.
    pub fn score(&self, student: &StudentProfile, catalog: &[ScholarshipRecord]) -> MatchOutcome {
        let signals = ProfileSignals::from_profile(student);
        let mut stats = RejectionStats::default();
        let mut matches: Vec<MatchResult> = catalog
            .iter()
            .filter_map(|scholarship| {
                rules::score_scholarship(&signals, scholarship, &self.config, &mut stats)
            })
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score));
        matches.truncate(self.config.shortlist_size);

        MatchOutcome { matches, stats }
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

/// Everything a matching pass hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub matches: Vec<MatchResult>,
    pub stats: RejectionStats,
}

/// One scored (student, scholarship) pairing with its audit trail.
///
/// `eligible` tracks unmet criteria, not the score: a scholarship can score
/// high on field, grades, and funding while still failing the student's
/// country preference.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub scholarship_id: String,
    pub scholarship_name: String,
    pub country: String,
    pub funding_type: String,
    pub deadline: String,
    pub score: u16,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
    pub eligible: bool,
    pub issues: Vec<String>,
}

impl MatchResult {
    /// Human-readable summary of why this scholarship matched, used as the
    /// reasoning column in the recommendation log.
    pub fn reasoning(&self) -> String {
        if self.reasons.is_empty() {
            "Potential match".to_string()
        } else {
            self.reasons.join(", ")
        }
    }
}

/// Per-criterion contribution to the total score. Component caps: degree 30,
/// field 25, country 15, CGPA 20, IELTS 10, funding 10, totalling 110.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ScoreBreakdown {
    pub degree_match: u8,
    pub field_match: u8,
    pub country_preference: u8,
    pub cgpa: u8,
    pub ielts: u8,
    pub funding_type: u8,
}

/// Catalog-wide counts of why scholarships fell short for this student.
/// `unlock_ielts` counts IELTS-only shortfalls against a realistic band,
/// signaling that a retake would change the outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionStats {
    pub rejected_degree: u32,
    pub rejected_field: u32,
    pub rejected_country: u32,
    pub rejected_cgpa: u32,
    pub rejected_ielts: u32,
    pub unlock_ielts: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> StudentProfile {
        StudentProfile {
            target_degree: "Masters".to_string(),
            field_of_study: "Computer Science".to_string(),
            preferred_countries: "Any".to_string(),
            cgpa: 3.8,
            ielts_band: 7.0,
        }
    }

    fn scholarship(id: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            id: id.to_string(),
            name: format!("Scholarship {id}"),
            country: "UK".to_string(),
            degree_level: "Masters".to_string(),
            field: "Computer Science".to_string(),
            funding_type: "Fully Funded".to_string(),
            deadline: "Open".to_string(),
            min_cgpa: 3.5,
            ielts_required: true,
            min_ielts_band: 6.5,
        }
    }

    #[test]
    fn perfect_match_scores_the_full_110() {
        let outcome = MatchEngine::default().score(&student(), &[scholarship("SCH-001")]);

        let result = &outcome.matches[0];
        assert_eq!(result.score, 110);
        assert!(result.eligible);
        assert!(result.issues.is_empty());
        assert_eq!(result.breakdown.degree_match, 30);
        assert_eq!(result.breakdown.field_match, 25);
        assert_eq!(result.breakdown.country_preference, 15);
        assert_eq!(result.breakdown.cgpa, 20);
        assert_eq!(result.breakdown.ielts, 10);
        assert_eq!(result.breakdown.funding_type, 10);
        assert_eq!(outcome.stats, RejectionStats::default());
    }

    #[test]
    fn shortlist_keeps_encounter_order_on_ties_and_cuts_at_ten() {
        let catalog: Vec<ScholarshipRecord> = (0..14)
            .map(|index| scholarship(&format!("SCH-{index:03}")))
            .collect();

        let outcome = MatchEngine::default().score(&student(), &catalog);

        assert_eq!(outcome.matches.len(), 10);
        let ids: Vec<&str> = outcome
            .matches
            .iter()
            .map(|result| result.scholarship_id.as_str())
            .collect();
        assert_eq!(ids[0], "SCH-000");
        assert_eq!(ids[9], "SCH-009");
    }

    #[test]
    fn empty_catalog_is_a_normal_outcome() {
        let outcome = MatchEngine::default().score(&student(), &[]);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.stats, RejectionStats::default());
    }

    #[test]
    fn no_cgpa_requirement_earns_less_than_a_met_minimum() {
        let mut open = scholarship("SCH-OPEN");
        open.min_cgpa = 0.0;

        let outcome = MatchEngine::default().score(&student(), &[open]);
        assert_eq!(outcome.matches[0].breakdown.cgpa, 10);
        assert_eq!(outcome.matches[0].score, 100);
    }
}
