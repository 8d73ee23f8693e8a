//! Fact aggregation
//!
//! **[RG-AGG-010]** Fans out all fact requests for one subject concurrently,
//! waits for every request to settle (join-all, no sibling cancellation), and
//! collects the results into a `FactBag` plus a `CompletenessReport`.
//!
//! An individual fact failure is recorded, not escalated. The aggregation as
//! a whole is reported Failed only when a critical fact (subject identity /
//! basic chart) is missing; everything else degrades to default-valued
//! report sections downstream.

use crate::services::catalog;
use crate::services::fact_client::{FactProvider, FactResult};
use futures::future::join_all;
use graha_common::SubjectParams;
use std::collections::HashMap;

/// Complete set of fact results for one subject (or one pair)
///
/// Invariant: every requested fact name appears exactly once, as Ok or
/// Failed, never absent. Read-only once aggregation returns.
#[derive(Debug, Clone, Default)]
pub struct FactBag {
    facts: HashMap<String, FactResult>,
}

impl FactBag {
    /// Build a bag from settled results (used by tests to stage bags directly)
    pub fn from_results(results: Vec<FactResult>) -> Self {
        let mut facts = HashMap::new();
        for result in results {
            facts.insert(result.fact.clone(), result);
        }
        Self { facts }
    }

    pub fn get(&self, fact: &str) -> Option<&FactResult> {
        self.facts.get(fact)
    }

    /// Payload of a fact, present only when the fact resolved Ok
    pub fn payload(&self, fact: &str) -> Option<&serde_json::Value> {
        self.facts.get(fact).and_then(|r| r.payload.as_ref())
    }

    pub fn contains_ok(&self, fact: &str) -> bool {
        self.facts.get(fact).map(|r| r.is_ok()).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// Aggregation status derived from the completeness counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationStatus {
    /// Every requested fact resolved Ok
    Full,
    /// Some facts failed, but all critical facts are present
    Partial,
    /// A critical fact is missing; no meaningful document can be produced
    Failed,
}

/// Per-aggregation completeness summary
///
/// Invariant: `succeeded + failed == total_requested`.
#[derive(Debug, Clone)]
pub struct CompletenessReport {
    pub total_requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failed_names: Vec<String>,
    pub status: AggregationStatus,
}

impl CompletenessReport {
    /// Fraction of requested facts that resolved Ok, in [0.0, 1.0]
    pub fn success_rate(&self) -> f64 {
        if self.total_requested == 0 {
            return 1.0;
        }
        self.succeeded as f64 / self.total_requested as f64
    }

    fn derive(bag: &FactBag, requested: &[&str]) -> Self {
        let mut failed_names: Vec<String> = Vec::new();
        for fact in requested {
            if !bag.contains_ok(fact) {
                failed_names.push((*fact).to_string());
            }
        }
        failed_names.sort();

        let total_requested = requested.len();
        let failed = failed_names.len();
        let succeeded = total_requested - failed;

        let status = if failed == 0 {
            AggregationStatus::Full
        } else if failed_names.iter().any(|f| catalog::is_critical(f)) {
            AggregationStatus::Failed
        } else {
            AggregationStatus::Partial
        };

        Self {
            total_requested,
            succeeded,
            failed,
            failed_names,
            status,
        }
    }
}

/// Dedupe fact names preserving request order
///
/// The bag invariant (one result per name) requires each name be requested
/// at most once.
fn unique_facts<'a>(fact_names: &[&'a str]) -> Vec<&'a str> {
    let mut seen = std::collections::HashSet::new();
    fact_names
        .iter()
        .copied()
        .filter(|f| seen.insert(*f))
        .collect()
}

/// Aggregate all named facts for one subject
///
/// **[RG-AGG-020]** All fetches run concurrently; every one settles before
/// this returns, so total latency is bounded by the slowest single fact.
pub async fn aggregate(
    provider: &dyn FactProvider,
    subject: &SubjectParams,
    fact_names: &[&str],
) -> (FactBag, CompletenessReport) {
    let requested = unique_facts(fact_names);

    let futures = requested
        .iter()
        .map(|fact| provider.fetch_fact(subject, fact));
    let results = join_all(futures).await;

    finish_aggregation(&subject.name, &requested, results)
}

/// Aggregate all named pair-addressed facts for a subject pair
pub async fn aggregate_pair(
    provider: &dyn FactProvider,
    primary: &SubjectParams,
    partner: &SubjectParams,
    fact_names: &[&str],
) -> (FactBag, CompletenessReport) {
    let requested = unique_facts(fact_names);

    let futures = requested
        .iter()
        .map(|fact| provider.fetch_pair_fact(primary, partner, fact));
    let results = join_all(futures).await;

    let label = format!("{} & {}", primary.name, partner.name);
    finish_aggregation(&label, &requested, results)
}

fn finish_aggregation(
    subject_label: &str,
    requested: &[&str],
    results: Vec<FactResult>,
) -> (FactBag, CompletenessReport) {
    let bag = FactBag::from_results(results);
    let report = CompletenessReport::derive(&bag, requested);

    match report.status {
        AggregationStatus::Full => {
            tracing::info!(
                subject = %subject_label,
                facts = report.total_requested,
                "Aggregation complete"
            );
        }
        AggregationStatus::Partial => {
            tracing::warn!(
                subject = %subject_label,
                succeeded = report.succeeded,
                failed = report.failed,
                failed_names = ?report.failed_names,
                "Aggregation partially complete"
            );
        }
        AggregationStatus::Failed => {
            tracing::error!(
                subject = %subject_label,
                failed_names = ?report.failed_names,
                "Aggregation missing critical facts"
            );
        }
    }

    (bag, report)
}
