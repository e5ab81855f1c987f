use super::{MatchConfig, MatchResult, RejectionStats, ScoreBreakdown};
use crate::store::{ScholarshipRecord, StudentProfile};

/// Pre-lowered view of the student profile so every scholarship comparison
/// reuses the same normalized strings.
pub(crate) struct ProfileSignals {
    target_degree: String,
    field_of_study: String,
    preferred_countries: String,
    cgpa: f32,
    ielts_band: f32,
}

impl ProfileSignals {
    pub(crate) fn from_profile(student: &StudentProfile) -> Self {
        Self {
            target_degree: student.target_degree.trim().to_lowercase(),
            field_of_study: student.field_of_study.trim().to_lowercase(),
            preferred_countries: student.preferred_countries.to_lowercase(),
            cgpa: student.cgpa,
            ielts_band: student.ielts_band,
        }
    }
}

/// Scores one scholarship against the student, folding per-criterion failures
/// into `stats`.
///
/// Degree level is the single hard gate: a mismatch produces no result at
/// all. Every later criterion awards partial or zero credit and records an
/// issue instead of excluding the scholarship, so a high score is not a proxy
/// for eligibility.
pub(crate) fn score_scholarship(
    student: &ProfileSignals,
    scholarship: &ScholarshipRecord,
    config: &MatchConfig,
    stats: &mut RejectionStats,
) -> Option<MatchResult> {
    let mut score: u16 = 0;
    let mut breakdown = ScoreBreakdown::default();
    let mut reasons = Vec::new();
    let mut issues = Vec::new();

    // 1. Degree gate.
    let degree_level = scholarship.degree_level.trim().to_lowercase();
    if degree_level != student.target_degree {
        stats.rejected_degree += 1;
        return None;
    }
    score += 30;
    breakdown.degree_match = 30;
    reasons.push("Degree Match".to_string());

    // 2. Field of study, substring match in either direction.
    let field = scholarship.field.trim().to_lowercase();
    if field.contains(&student.field_of_study) || student.field_of_study.contains(&field) {
        score += 25;
        breakdown.field_match = 25;
        reasons.push("Field Match".to_string());
    } else {
        // Partial credit for sharing the degree level.
        score += 5;
        breakdown.field_match = 5;
        issues.push(format!("Field mismatch (requires {})", scholarship.field));
        stats.rejected_field += 1;
    }

    // 3. Country preference.
    let country = scholarship.country.trim().to_lowercase();
    if student.preferred_countries.contains("any") || student.preferred_countries.contains(&country)
    {
        score += 15;
        breakdown.country_preference = 15;
        reasons.push(format!("Country: {}", scholarship.country));
    } else {
        issues.push(format!("Country mismatch (requires {})", scholarship.country));
        stats.rejected_country += 1;
    }

    // 4. CGPA threshold. A met explicit minimum intentionally outscores the
    // no-minimum case: demonstrated over-qualification earns more credit.
    if scholarship.min_cgpa > 0.0 {
        if student.cgpa >= scholarship.min_cgpa {
            score += 20;
            breakdown.cgpa = 20;
            reasons.push("CGPA Qualified".to_string());
        } else {
            issues.push(format!(
                "CGPA below {} (yours: {})",
                scholarship.min_cgpa, student.cgpa
            ));
            stats.rejected_cgpa += 1;
        }
    } else {
        score += 10;
        breakdown.cgpa = 10;
    }

    // 5. IELTS threshold.
    if !scholarship.ielts_required {
        score += 10;
        breakdown.ielts = 10;
        reasons.push("No IELTS Required".to_string());
    } else if student.ielts_band >= scholarship.min_ielts_band {
        score += 10;
        breakdown.ielts = 10;
        reasons.push("IELTS Qualified".to_string());
    } else {
        issues.push(format!(
            "IELTS below {} (yours: {})",
            scholarship.min_ielts_band, student.ielts_band
        ));
        stats.rejected_ielts += 1;

        // A shortfall against a realistic band is an unlock opportunity: one
        // retake could flip this scholarship.
        if scholarship.min_ielts_band <= config.attainable_ielts_band {
            stats.unlock_ielts += 1;
        }
    }

    // 6. Funding bonus; never an eligibility issue.
    if scholarship.funding_type.to_lowercase().contains("fully funded") {
        score += 10;
        breakdown.funding_type = 10;
        reasons.push("Fully Funded".to_string());
    }

    let eligible = issues.is_empty();

    Some(MatchResult {
        scholarship_id: scholarship.id.clone(),
        scholarship_name: scholarship.name.clone(),
        country: scholarship.country.clone(),
        funding_type: scholarship.funding_type.clone(),
        deadline: scholarship.deadline.clone(),
        score,
        breakdown,
        reasons,
        eligible,
        issues,
    })
}
