//! Skill match analysis
//!
//! Compares a skill level against a record's public required level. Pure
//! computation over already-known values; nothing here touches record state.

use super::record::Record;
use serde::Serialize;

/// Level assumed when neither a skill nor a required level is known.
pub const FALLBACK_LEVEL: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SkillAnalysis {
    /// Percentage of the required level met, capped at 100.
    pub match_score: u32,
    pub skill_gap: u32,
    pub compatibility: u32,
    /// Capped at 95.
    pub potential: u32,
    /// `100 - match_score`, clamped to 5..=95.
    pub risk_level: u32,
}

impl SkillAnalysis {
    /// Analyse `record` against a candidate level.
    ///
    /// A verified record is analysed with its revealed value; otherwise the
    /// candidate level is used, then the required level, then
    /// `FALLBACK_LEVEL`.
    pub fn compute(record: &Record, candidate_level: Option<u32>) -> Self {
        let required = record.attributes().required_level;
        let skill = match record.revealed_value() {
            Some(value) => value,
            None => candidate_level
                .filter(|level| *level > 0)
                .unwrap_or(if required > 0 { required } else { FALLBACK_LEVEL }),
        };
        Self::from_levels(skill, required)
    }

    /// Analysis for explicit levels. A zero required level is treated as
    /// `FALLBACK_LEVEL`.
    pub fn from_levels(skill: u32, required: u32) -> Self {
        let required = if required == 0 { FALLBACK_LEVEL } else { required };
        let s = f64::from(skill);
        let r = f64::from(required);

        let match_score = ((s / r) * 100.0).round().min(100.0) as u32;
        let compatibility = ((s * 0.6 + r * 0.4) * 10.0).round() as u32;
        let potential = ((s * 0.3 + r * 0.7) * 15.0).round().min(95.0) as u32;
        let risk_level = 100u32.saturating_sub(match_score).clamp(5, 95);

        Self {
            match_score,
            skill_gap: skill.abs_diff(required),
            compatibility,
            potential,
            risk_level,
        }
    }
}
