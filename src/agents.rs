//! Read-only query over the education-agent directory.

use crate::store::RecordStore;
use serde::Serialize;

/// Minimum trust score an agent needs to appear in the directory.
const TRUST_FLOOR: f32 = 70.0;

/// Directory listing exposed for a vetted agent.
#[derive(Debug, Clone, Serialize)]
pub struct TrustedAgentView {
    pub name: String,
    pub license: String,
    pub rating: f32,
    pub trust_score: f32,
    pub complaints: u32,
    pub details: String,
}

/// Returns agents with status Active or Verified and a trust score of at
/// least 70, ordered by trust score then rating, both descending.
pub fn trusted_agents(store: &RecordStore) -> Vec<TrustedAgentView> {
    let mut agents: Vec<TrustedAgentView> = store
        .agents()
        .into_iter()
        .filter(|agent| {
            let status = agent.status.trim();
            (status.eq_ignore_ascii_case("active") || status.eq_ignore_ascii_case("verified"))
                && agent.trust_score >= TRUST_FLOOR
        })
        .map(|agent| TrustedAgentView {
            name: agent.name,
            license: agent.license,
            rating: agent.rating,
            trust_score: agent.trust_score,
            complaints: agent.complaints,
            details: agent.details,
        })
        .collect();

    agents.sort_by(|a, b| {
        b.trust_score
            .total_cmp(&a.trust_score)
            .then(b.rating.total_cmp(&a.rating))
    });
    agents
}
