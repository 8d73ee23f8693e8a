//! Papasamyam (malefic balance) verdict
//!
//! **[RG-SCO-040]** Directional numeric balance: each subject accumulates
//! malefic points from a fixed contributor set measured from three reference
//! points. The rule is asymmetric: the match is favorable when the primary
//! subject's total is greater than or equal to the partner's.

use crate::extract::Extract;
use crate::services::aggregator::FactBag;
use crate::services::catalog::PAPASAMYAM_DETAILS;

/// Fixed malefic contributor set
pub const MALEFICS: [&str; 4] = ["mars", "saturn", "sun", "rahu"];

/// Reference points the contributions are measured from: the ascendant
/// (anchor), the Moon (secondary), and Venus (tertiary)
pub const REFERENCE_POINTS: [&str; 3] = ["lagna", "moon", "venus"];

/// Directional balance verdict for one pair
#[derive(Debug, Clone)]
pub struct BalanceVerdict {
    pub groom_total: f64,
    pub bride_total: f64,
    /// True when `groom_total >= bride_total` (order of subjects matters)
    pub favorable: bool,
}

/// Sum one subject's malefic points from the pair payload
///
/// Per malefic, a precomputed `{side}.{malefic}_points` value is preferred;
/// when absent the total is derived as the sum of the `{side}.{malefic}`
/// breakdown, whose members are the reference-point contributions
/// (lagna, moon, venus). Missing sub-facts contribute zero.
fn subject_total(x: &Extract<'_>, side: &str) -> f64 {
    MALEFICS
        .iter()
        .map(|malefic| {
            x.number_or_sum(
                PAPASAMYAM_DETAILS,
                &[format!("{}.{}_points", side, malefic)],
                &format!("{}.{}", side, malefic),
                None,
                0.0,
            )
        })
        .sum()
}

/// Compute the balance verdict from the pair fact bag
///
/// An absent papasamyam fact yields a zero/zero verdict, which reads as
/// favorable (equal totals) rather than failing the report.
pub fn papasamyam_verdict(pair: &FactBag) -> BalanceVerdict {
    let x = Extract::new(pair);

    let groom_total = subject_total(&x, "male");
    let bride_total = subject_total(&x, "female");

    BalanceVerdict {
        groom_total,
        bride_total,
        favorable: groom_total >= bride_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fact_client::FactResult;
    use serde_json::{json, Value};

    fn pair_bag(payload: Value) -> FactBag {
        FactBag::from_results(vec![FactResult::ok(PAPASAMYAM_DETAILS, payload)])
    }

    fn side(mars: f64, saturn: f64, sun: f64, rahu: f64) -> Value {
        // Spread each contributor's points across the three reference points
        let split = |p: f64| json!({"lagna": p / 2.0, "moon": p / 4.0, "venus": p / 4.0});
        json!({
            "mars": split(mars),
            "saturn": split(saturn),
            "sun": split(sun),
            "rahu": split(rahu),
        })
    }

    #[test]
    fn test_groom_dominant_is_favorable() {
        let bag = pair_bag(json!({
            "male": side(4.0, 2.0, 1.0, 1.0),
            "female": side(2.0, 1.0, 1.0, 0.0),
        }));
        let v = papasamyam_verdict(&bag);

        assert!((v.groom_total - 8.0).abs() < 1e-9);
        assert!((v.bride_total - 4.0).abs() < 1e-9);
        assert!(v.favorable);
    }

    #[test]
    fn test_bride_dominant_is_unfavorable() {
        let bag = pair_bag(json!({
            "male": side(1.0, 0.0, 0.0, 0.0),
            "female": side(3.0, 2.0, 0.0, 0.0),
        }));
        let v = papasamyam_verdict(&bag);

        assert!(!v.favorable);
    }

    #[test]
    fn test_equal_totals_favorable() {
        // Asymmetric rule: >= is favorable, so equality passes
        let bag = pair_bag(json!({
            "male": side(2.0, 2.0, 0.0, 0.0),
            "female": side(2.0, 2.0, 0.0, 0.0),
        }));
        assert!(papasamyam_verdict(&bag).favorable);
    }

    #[test]
    fn test_flat_fallback_shape() {
        let bag = pair_bag(json!({
            "male": {"mars_points": 3, "saturn_points": 1, "sun_points": 0, "rahu_points": 0},
            "female": {"mars_points": 1, "saturn_points": 0, "sun_points": 0, "rahu_points": 0},
        }));
        let v = papasamyam_verdict(&bag);

        assert!((v.groom_total - 4.0).abs() < 1e-9);
        assert!((v.bride_total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_absent_fact_degrades_to_zero_verdict() {
        let bag = FactBag::from_results(vec![FactResult::failed(PAPASAMYAM_DETAILS)]);
        let v = papasamyam_verdict(&bag);

        assert!((v.groom_total - 0.0).abs() < 1e-9);
        assert!((v.bride_total - 0.0).abs() < 1e-9);
        assert!(v.favorable);
    }

    #[test]
    fn test_partially_missing_contributors_sum_what_exists() {
        let bag = pair_bag(json!({
            "male": {"mars": {"lagna": 2.0}},
            "female": {},
        }));
        let v = papasamyam_verdict(&bag);

        assert!((v.groom_total - 2.0).abs() < 1e-9);
        assert!((v.bride_total - 0.0).abs() < 1e-9);
    }
}
