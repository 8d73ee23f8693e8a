//! Manglik (Mars affliction) verdict
//!
//! **[RG-SCO-030]** Categorical verdict with a symmetric-neutralization rule:
//! the affliction cancels when both subjects carry it. This is a fixed
//! decision table, not a weighted score.

use crate::extract::Extract;
use crate::services::aggregator::FactBag;
use crate::services::catalog::MANGLIK;

/// Headline conclusion of the affliction verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfflictionConclusion {
    /// Neither subject afflicted
    FavorableAbsent,
    /// Both afflicted; effects cancel
    FavorableNeutralized,
    /// Exactly one afflicted; remediable
    UnfavorableRemediable,
}

impl AfflictionConclusion {
    pub fn as_str(&self) -> &'static str {
        match self {
            AfflictionConclusion::FavorableAbsent => "favorable",
            AfflictionConclusion::FavorableNeutralized => "favorable-neutralized",
            AfflictionConclusion::UnfavorableRemediable => "unfavorable-remediable",
        }
    }
}

/// Per-pair affliction verdict. Immutable, computed once per report.
#[derive(Debug, Clone)]
pub struct AfflictionVerdict {
    pub groom_present: bool,
    pub bride_present: bool,
    /// Severity percentages as reported upstream, [0, 100]
    pub groom_percent: f64,
    pub bride_percent: f64,
}

impl AfflictionVerdict {
    /// The affliction is neutralized exactly when both subjects carry it
    pub fn is_neutralized(&self) -> bool {
        self.groom_present && self.bride_present
    }

    /// Three-way decision table over the two presence flags
    pub fn conclusion(&self) -> AfflictionConclusion {
        match (self.groom_present, self.bride_present) {
            (false, false) => AfflictionConclusion::FavorableAbsent,
            (true, true) => AfflictionConclusion::FavorableNeutralized,
            _ => AfflictionConclusion::UnfavorableRemediable,
        }
    }
}

/// Candidate payload locations for the presence flag and severity percentage
pub const PRESENT_PATHS: [&str; 3] = ["manglik_report.is_present", "is_present", "is_manglik"];
pub const PERCENT_PATHS: [&str; 3] = [
    "manglik_report.manglik_present_rule.percentage_manglik_present",
    "percentage_manglik_present",
    "manglik_percent",
];

/// Read each subject's own manglik fact and combine into the pair verdict
///
/// A missing fact reads as not-present with zero severity (graceful default,
/// consistent with the rest of the degradation policy).
pub fn manglik_verdict(groom: &FactBag, bride: &FactBag) -> AfflictionVerdict {
    let gx = Extract::new(groom);
    let bx = Extract::new(bride);

    AfflictionVerdict {
        groom_present: gx.boolean(MANGLIK, &PRESENT_PATHS, false),
        bride_present: bx.boolean(MANGLIK, &PRESENT_PATHS, false),
        groom_percent: gx.number(MANGLIK, &PERCENT_PATHS, 0.0).clamp(0.0, 100.0),
        bride_percent: bx.number(MANGLIK, &PERCENT_PATHS, 0.0).clamp(0.0, 100.0),
    }
}
