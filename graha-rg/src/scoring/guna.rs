//! Ten-attribute (dashakoot) point table
//!
//! **[RG-SCO-020]** Fixed ten-row point system. Each row carries both
//! subjects' attribute values, the declared maximum, and the received points;
//! rows are clamped so `0 <= received <= max` holds unconditionally. The
//! grand total is the row sum unless the upstream payload declares its own
//! authoritative total, which is preferred; a disagreement between the two
//! is recorded on the table and surfaced as a generation warning rather than
//! silently ignored.

use crate::extract::Extract;
use crate::services::aggregator::FactBag;
use crate::services::catalog::MATCH_DASHAKOOT;

/// Declared maximum for the grand total when the upstream value is missing
/// or zero
pub const GRAND_MAX_POINTS: f64 = 36.0;

/// Tolerance when comparing an upstream total against the computed row sum
const TOTAL_EPSILON: f64 = 1e-6;

/// The ten dashakoot attributes, in display order
///
/// `key` is the upstream payload key; `label` is the rendered row caption.
pub const ATTRIBUTES: [(&str, &str); 10] = [
    ("dina", "Dina"),
    ("gana", "Gana"),
    ("mahendra", "Mahendra"),
    ("sthree", "Stree Dirgha"),
    ("yoni", "Yoni"),
    ("rasi", "Rasi"),
    ("rasiathi", "Rasi Lord"),
    ("vasya", "Vasya"),
    ("rajju", "Rajju"),
    ("vedha", "Vedha"),
];

/// One attribute row of the point table
#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub attribute: &'static str,
    pub groom_value: String,
    pub bride_value: String,
    pub max_points: f64,
    pub received_points: f64,
}

/// The complete ten-row table plus derived totals
#[derive(Debug, Clone)]
pub struct ScoreTable {
    pub rows: Vec<ScoreRow>,
    /// Displayed grand total (upstream-declared when present, else row sum)
    pub total_received: f64,
    /// Declared grand maximum (upstream, else `GRAND_MAX_POINTS`)
    pub total_max: f64,
    /// True when an upstream-declared total disagreed with the row sum
    pub total_mismatch: bool,
}

impl ScoreTable {
    /// Sum of per-row received points (always consistent with `rows`)
    pub fn row_sum(&self) -> f64 {
        self.rows.iter().map(|r| r.received_points).sum()
    }
}

/// Build the ten-attribute table from the pair fact bag
///
/// A missing dashakoot fact yields ten zeroed rows with "N/A" values; the
/// table shape never varies.
pub fn score_table(pair: &FactBag) -> ScoreTable {
    let x = Extract::new(pair);
    let mut rows = Vec::with_capacity(ATTRIBUTES.len());

    for (key, label) in ATTRIBUTES {
        let groom_value = x.text(
            MATCH_DASHAKOOT,
            &[
                &format!("{}.male_koot_attribute", key),
                &format!("{}.male_attribute", key),
                &format!("{}.male", key),
            ],
            "N/A",
        );
        let bride_value = x.text(
            MATCH_DASHAKOOT,
            &[
                &format!("{}.female_koot_attribute", key),
                &format!("{}.female_attribute", key),
                &format!("{}.female", key),
            ],
            "N/A",
        );
        let max_points = x
            .number(
                MATCH_DASHAKOOT,
                &[
                    &format!("{}.total_points", key),
                    &format!("{}.max_points", key),
                ],
                0.0,
            )
            .max(0.0);
        let received = x.number(
            MATCH_DASHAKOOT,
            &[
                &format!("{}.obtained_points", key),
                &format!("{}.points", key),
            ],
            0.0,
        );

        if received > max_points {
            tracing::warn!(
                attribute = key,
                received,
                max = max_points,
                "Received points exceed declared maximum; clamping"
            );
        }
        let received_points = received.clamp(0.0, max_points);

        rows.push(ScoreRow {
            attribute: label,
            groom_value,
            bride_value,
            max_points,
            received_points,
        });
    }

    let row_sum: f64 = rows.iter().map(|r| r.received_points).sum();

    // Upstream-declared grand total is authoritative when present
    let upstream_total = x
        .value(
            MATCH_DASHAKOOT,
            &["total.obtained_points", "total.points", "total_points"],
        )
        .and_then(|v| match v {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });

    let (total_received, total_mismatch) = match upstream_total {
        Some(t) => {
            let mismatch = (t - row_sum).abs() > TOTAL_EPSILON;
            if mismatch {
                tracing::warn!(
                    upstream_total = t,
                    row_sum,
                    "Upstream grand total disagrees with row sum"
                );
            }
            (t, mismatch)
        }
        None => (row_sum, false),
    };

    let upstream_max = x.number(
        MATCH_DASHAKOOT,
        &["total.total_points", "total.max_points", "maximum_points"],
        0.0,
    );
    let total_max = if upstream_max > 0.0 {
        upstream_max
    } else {
        GRAND_MAX_POINTS
    };

    ScoreTable {
        rows,
        total_received,
        total_max,
        total_mismatch,
    }
}
