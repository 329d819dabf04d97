//! The filter engine
//!
//! Pure functions from (rows, criteria) to a filtered subset and to the
//! candidate lists that populate the cascading selectors. Nothing here does
//! I/O or mutates the input rows; every evaluation is a full pass over the
//! in-memory table.
//!
//! Search terms are always matched as literal substrings: any regex
//! metacharacters in user input are escaped before a pattern is built, so
//! malformed or adversarial terms are never an error.

use std::collections::BTreeSet;

use regex::RegexBuilder;

use crate::core::constants::{MAX_RESULT_ROWS, UNCONSTRAINED};
use crate::utils::string::contains_ci;

use super::criteria::{Criteria, SearchMode};
use super::record::{HierarchyField, Record};

/// Result of one policy-checked search pass
#[derive(Debug, PartialEq, Eq)]
pub enum SearchOutcome<'a> {
    /// No filter is active; evaluation was not run
    NoFilter,
    /// More rows matched than the display cap allows; rows are suppressed
    TooLarge { count: usize },
    /// Filters are active but nothing matched
    Empty,
    /// The matching subset, in original row order
    Rows(Vec<&'a Record>),
}

/// Distinct candidate values for one hierarchy selector.
///
/// Applies the single most specific constrained ancestor selection, drops
/// rows with a missing or empty value for `field`, and returns the sorted
/// distinct values with the unconstrained sentinel first. One pass over the
/// table, no side effects.
pub fn candidate_values(rows: &[Record], field: HierarchyField, criteria: &Criteria) -> Vec<String> {
    let constraint = field
        .ancestors()
        .iter()
        .find_map(|ancestor| criteria.selection(*ancestor).map(|v| (*ancestor, v)));

    let distinct: BTreeSet<&str> = rows
        .iter()
        .filter(|record| match constraint {
            Some((ancestor, value)) => ancestor.value(record) == Some(value),
            None => true,
        })
        .filter_map(|record| field.value(record))
        .filter(|value| !value.is_empty())
        .collect();

    let mut values = Vec::with_capacity(distinct.len() + 1);
    values.push(UNCONSTRAINED.to_string());
    values.extend(distinct.into_iter().map(str::to_string));
    values
}

/// Drop stale narrower selections.
///
/// A narrower hierarchical selection that no longer appears in the candidate
/// list recomputed under its broader selections is treated as unconstrained.
/// Recomputed on demand rather than cached, so it can never go stale.
pub fn normalize(rows: &[Record], criteria: &Criteria) -> Criteria {
    let mut normalized = criteria.clone();
    for field in [
        HierarchyField::DepartmentName,
        HierarchyField::OrganizationAcronym,
        HierarchyField::OrganizationName,
    ] {
        let Some(selection) = normalized.selection(field) else {
            continue;
        };
        let selection = selection.to_string();
        let candidates = candidate_values(rows, field, &normalized);
        if !candidates.iter().any(|c| *c == selection) {
            normalized.clear_selection(field);
        }
    }
    normalized
}

/// Apply every active filter, in fixed order, and return the matching subset.
///
/// Order: the four exact equality filters, the email-presence filter, the
/// structure-term search, the title-term search (same mode), then the global
/// any-field search. Original row order is preserved.
pub fn evaluate<'a>(rows: &'a [Record], criteria: &Criteria) -> Vec<&'a Record> {
    let mut matched: Vec<&Record> = rows.iter().collect();

    for field in HierarchyField::ALL {
        if let Some(selection) = criteria.selection(field) {
            matched.retain(|record| field.value(record) == Some(selection));
        }
    }

    if criteria.require_email {
        matched.retain(|record| record.email.as_deref().is_some_and(|e| !e.is_empty()));
    }

    apply_term_search(
        &mut matched,
        &criteria.active_structure_terms(),
        criteria.mode,
        |record| record.organization_structure.as_deref(),
    );
    apply_term_search(
        &mut matched,
        &criteria.active_title_terms(),
        criteria.mode,
        |record| record.title.as_deref(),
    );

    // Global search is always "any field matches", independent of the mode.
    if let Some(term) = criteria.active_global_term() {
        matched.retain(|record| {
            record
                .fields()
                .iter()
                .any(|(_, value)| value.is_some_and(|v| contains_ci(v, term)))
        });
    }

    matched
}

/// Evaluate with the result-size policy applied.
///
/// Default criteria never trigger row filtering; a result above the display
/// cap reports its count without rows; an empty result is distinct from the
/// not-yet-filtered state.
pub fn search<'a>(rows: &'a [Record], criteria: &Criteria) -> SearchOutcome<'a> {
    if !criteria.is_active() {
        return SearchOutcome::NoFilter;
    }
    let matched = evaluate(rows, criteria);
    if matched.len() > MAX_RESULT_ROWS {
        SearchOutcome::TooLarge {
            count: matched.len(),
        }
    } else if matched.is_empty() {
        SearchOutcome::Empty
    } else {
        SearchOutcome::Rows(matched)
    }
}

/// Multi-term substring search over one field.
///
/// `All` mode applies each term as an independent successive filter; `Any`
/// mode builds one case-insensitive alternation over the escaped terms.
fn apply_term_search<'a, F>(matched: &mut Vec<&'a Record>, terms: &[&str], mode: SearchMode, value: F)
where
    F: Fn(&Record) -> Option<&str>,
{
    if terms.is_empty() {
        return;
    }
    match mode {
        SearchMode::All => {
            for term in terms {
                matched.retain(|record| value(record).is_some_and(|v| contains_ci(v, term)));
            }
        }
        SearchMode::Any => {
            let alternation = terms
                .iter()
                .map(|t| regex::escape(t))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .expect("escaped alternation is a valid pattern");
            matched.retain(|record| value(record).is_some_and(|v| pattern.is_match(v)));
        }
    }
}
