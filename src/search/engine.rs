//! Match Engine
//!
//! Decides which passes a query selects. A pass is included when any tier
//! accepts it, checked in this order:
//!
//! 1. `Exact`: name or category equals the query, ignoring case
//! 2. `NumericExact`: the query's leading integer is in `passNumbers` or in a
//!    `passNumbersStatus` entry's `number`
//! 3. `Partial`: the query is not numeric and name or category contains it,
//!    ignoring case
//!
//! Tiers decide inclusion only. Results keep the collection's order.

use super::parser::{ParsedQuery, QueryParser};
use crate::passes::PassRecord;
use tracing::debug;

/// Tier that admitted a pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    NumericExact,
    Partial,
}

/// First tier that accepts `record`, or `None` if it is excluded
pub fn match_tier(query: &ParsedQuery, record: &PassRecord) -> Option<MatchTier> {
    let text_fields = [record.name.as_deref(), record.category.as_deref()];

    if text_fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase() == query.folded)
    {
        return Some(MatchTier::Exact);
    }

    if let Some(number) = query.integer {
        let in_numbers = record
            .pass_numbers
            .as_ref()
            .is_some_and(|numbers| numbers.contains(&number));
        let in_status = record
            .pass_numbers_status
            .as_ref()
            .is_some_and(|statuses| statuses.iter().any(|s| s.number == Some(number)));

        if in_numbers || in_status {
            return Some(MatchTier::NumericExact);
        }
    }

    if !query.is_numeric
        && text_fields
            .iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query.folded))
    {
        return Some(MatchTier::Partial);
    }

    None
}

/// Keep the passes some tier accepts, in their original order
pub fn filter_passes(query: &ParsedQuery, records: Vec<PassRecord>) -> Vec<PassRecord> {
    let total = records.len();
    let mut tier_counts = [0usize; 3];

    let matched: Vec<PassRecord> = records
        .into_iter()
        .filter(|record| match match_tier(query, record) {
            Some(tier) => {
                tier_counts[tier as usize] += 1;
                true
            }
            None => false,
        })
        .collect();

    debug!(
        query = %query.original,
        total,
        matched = matched.len(),
        exact = tier_counts[MatchTier::Exact as usize],
        numeric = tier_counts[MatchTier::NumericExact as usize],
        partial = tier_counts[MatchTier::Partial as usize],
        "Filtered passes"
    );

    matched
}

/// Result set for `query` over a fetched collection.
///
/// The empty query returns the collection untouched; only non-empty queries
/// reach the tiers.
pub fn apply_query(query: &str, records: Vec<PassRecord>) -> Vec<PassRecord> {
    match QueryParser::parse(query) {
        Some(parsed) => filter_passes(&parsed, records),
        None => records,
    }
}
