//! Plain-text rendering of a matching pass for the command line.

use super::MatchOutcome;
use crate::store::StudentProfile;

/// Renders the shortlist and rejection analytics as the multi-line report
/// the `match` subcommand prints. An empty catalog or empty shortlist is a
/// normal outcome and renders as such.
pub fn render(profile: &StudentProfile, outcome: &MatchOutcome, catalog_size: usize) -> String {
    let mut out = String::new();

    out.push_str("Scholarship match report\n");
    out.push_str(&format!(
        "Profile: {} in {}, countries: {}, CGPA {}, IELTS {}\n",
        profile.target_degree,
        profile.field_of_study,
        profile.preferred_countries,
        profile.cgpa,
        profile.ielts_band
    ));
    out.push_str(&format!("Catalog size: {catalog_size}\n"));

    if outcome.matches.is_empty() {
        out.push_str("\nShortlist: empty\n");
    } else {
        out.push_str("\nShortlist\n");
        for (rank, result) in outcome.matches.iter().enumerate() {
            let verdict = if result.eligible {
                "eligible"
            } else {
                "not eligible"
            };
            out.push_str(&format!(
                "{:>2}. [{:>3}] {} ({}, {}, deadline {}) - {}\n",
                rank + 1,
                result.score,
                result.scholarship_name,
                result.country,
                result.funding_type,
                result.deadline,
                verdict
            ));
            if !result.issues.is_empty() {
                out.push_str(&format!("      issues: {}\n", result.issues.join("; ")));
            }
        }
    }

    let stats = &outcome.stats;
    out.push_str("\nWhy scholarships fell short\n");
    out.push_str(&format!("- wrong degree level: {}\n", stats.rejected_degree));
    out.push_str(&format!("- field mismatch: {}\n", stats.rejected_field));
    out.push_str(&format!("- country mismatch: {}\n", stats.rejected_country));
    out.push_str(&format!("- CGPA below minimum: {}\n", stats.rejected_cgpa));
    out.push_str(&format!("- IELTS below minimum: {}\n", stats.rejected_ielts));
    if stats.unlock_ielts > 0 {
        out.push_str(&format!(
            "- within reach with a better IELTS band: {}\n",
            stats.unlock_ielts
        ));
    }

    out
}
