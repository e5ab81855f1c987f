use serde::{Deserialize, Deserializer, Serialize};

/// Catalog entry for one scholarship. Maintained by an external process; the
/// core only ever reads these rows.
///
/// Numeric and boolean cells in the source spreadsheets are frequently blank
/// or hold placeholder text like "N/A", so those fields default rather than
/// fail: a zero minimum means "no requirement".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScholarshipRecord {
    #[serde(rename = "Scholarship_ID")]
    pub id: String,
    #[serde(rename = "Scholarship_Name")]
    pub name: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Degree_Level", default)]
    pub degree_level: String,
    #[serde(rename = "Field", default)]
    pub field: String,
    #[serde(rename = "Funding_Type", default)]
    pub funding_type: String,
    #[serde(rename = "Deadline", default = "open_deadline")]
    pub deadline: String,
    #[serde(rename = "Min_CGPA", default, deserialize_with = "cell_f32")]
    pub min_cgpa: f32,
    #[serde(rename = "IELTS_Required", default, deserialize_with = "cell_bool")]
    pub ielts_required: bool,
    #[serde(rename = "Min_IELTS_Band", default, deserialize_with = "cell_f32")]
    pub min_ielts_band: f32,
}

/// The profile a student submits for a matching pass. Never persisted by the
/// core; it lives only for the duration of one scoring request.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentProfile {
    pub target_degree: String,
    pub field_of_study: String,
    #[serde(default = "any_country")]
    pub preferred_countries: String,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub cgpa: f32,
    #[serde(default, deserialize_with = "lenient_f32")]
    pub ielts_band: f32,
}

/// Append-only log row recording one ranked recommendation handed to a
/// student. Entries are never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationEntry {
    #[serde(rename = "Match_ID")]
    pub id: String,
    #[serde(rename = "Profile_ID")]
    pub profile_id: String,
    #[serde(rename = "Scholarship_ID")]
    pub scholarship_id: String,
    #[serde(rename = "Score")]
    pub score: u16,
    #[serde(rename = "Rank")]
    pub rank: u32,
    #[serde(rename = "Matched_On")]
    pub matched_on: String,
    #[serde(rename = "Reasoning", default)]
    pub reasoning: String,
    #[serde(rename = "Sent_To_User", default, deserialize_with = "cell_bool")]
    pub sent_to_user: bool,
    #[serde(rename = "User_Feedback", default)]
    pub user_feedback: String,
}

/// A student's tracked pursuit of one scholarship. At most one record exists
/// per (profile, scholarship) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(rename = "Application_ID")]
    pub id: String,
    #[serde(rename = "Profile_ID")]
    pub profile_id: String,
    #[serde(rename = "Scholarship_ID")]
    pub scholarship_id: String,
    #[serde(rename = "Status")]
    pub status: ApplicationStatus,
    #[serde(rename = "Applied_On", default)]
    pub applied_on: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

/// Lifecycle states for a tracked application.
///
/// Transitions are deliberately unrestricted: rejections get appealed and
/// shortlistings get withdrawn, so the tracker models reversals instead of a
/// strict funnel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Interested,
    Applied,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Interested => "Interested",
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Shortlisted => "Shortlisted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

/// Education agent listing used by the trusted-agent directory query.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "License", default)]
    pub license: String,
    #[serde(rename = "Rating", default, deserialize_with = "cell_f32")]
    pub rating: f32,
    #[serde(rename = "Trust_Score", default, deserialize_with = "cell_f32")]
    pub trust_score: f32,
    #[serde(rename = "Complaints", default, deserialize_with = "cell_u32")]
    pub complaints: u32,
    #[serde(rename = "Details", default)]
    pub details: String,
    #[serde(rename = "Status", default)]
    pub status: String,
}

/// One interview-preparation prompt with its vetted guidance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepQuestion {
    #[serde(rename = "Category", default)]
    pub category: String,
    #[serde(rename = "Question")]
    pub question: String,
    #[serde(rename = "Official_Guidance", default)]
    pub official_guidance: String,
}

fn open_deadline() -> String {
    "Open".to_string()
}

fn any_country() -> String {
    "Any".to_string()
}

/// Parses a tabular cell as f32, treating blanks and junk text as zero.
fn cell_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<f32>().ok())
        .unwrap_or(0.0))
}

fn cell_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(0))
}

/// Accepts the yes/no style flags found in the catalog spreadsheets.
fn cell_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "yes" | "y" | "true" | "1"
            )
        })
        .unwrap_or(false))
}

/// JSON-side lenient float: numbers pass through, numeric strings parse, and
/// anything else (null, blanks, junk) falls back to zero instead of erroring.
fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f32),
        Text(String),
    }

    let raw = Option::<Raw>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(value)) => value,
        Some(Raw::Text(value)) => value.trim().parse().unwrap_or(0.0),
        None => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scholarship_rows_default_missing_requirements() {
        let data = "\
Scholarship_ID,Scholarship_Name,Country,Degree_Level,Field,Funding_Type,Min_CGPA,IELTS_Required,Min_IELTS_Band
SCH-001,Chevening,UK,Masters,Any Field,Fully Funded,N/A,No,
SCH-002,DAAD,Germany,Masters,Engineering,Partial,3.0,Yes,6.5
";
        let mut reader = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<ScholarshipRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("rows parse");

        assert_eq!(rows[0].min_cgpa, 0.0);
        assert!(!rows[0].ielts_required);
        assert_eq!(rows[0].min_ielts_band, 0.0);
        assert_eq!(rows[0].deadline, "Open");
        assert!(rows[1].ielts_required);
        assert_eq!(rows[1].min_ielts_band, 6.5);
    }

    #[test]
    fn student_profile_tolerates_non_numeric_scores() {
        let profile: StudentProfile = serde_json::from_str(
            r#"{
                "target_degree": "Masters",
                "field_of_study": "Computer Science",
                "cgpa": "not-a-number",
                "ielts_band": null
            }"#,
        )
        .expect("profile parses");

        assert_eq!(profile.cgpa, 0.0);
        assert_eq!(profile.ielts_band, 0.0);
        assert_eq!(profile.preferred_countries, "Any");
    }

    #[test]
    fn application_status_round_trips_through_csv() {
        let record = ApplicationRecord {
            id: "app-1".to_string(),
            profile_id: "P001".to_string(),
            scholarship_id: "SCH-001".to_string(),
            status: ApplicationStatus::Shortlisted,
            applied_on: "2026-08-30".to_string(),
            notes: String::new(),
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).expect("record serializes");
        let bytes = writer.into_inner().expect("writer yields buffer");

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let parsed: ApplicationRecord = reader
            .deserialize()
            .next()
            .expect("one row")
            .expect("row parses");
        assert_eq!(parsed, record);
        assert_eq!(parsed.status.label(), "Shortlisted");
    }
}
