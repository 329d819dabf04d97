//! Filter criteria
//!
//! A value object holding the complete set of filter and search selections
//! at one evaluation moment. Criteria are rebuilt from client input on every
//! request; the engine never persists state between evaluations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::constants::{MAX_SEARCH_TERMS, UNCONSTRAINED};

use super::record::HierarchyField;

/// Combination policy for multi-term text search.
///
/// One shared mode drives both the structure search and the title search;
/// the two do not have independent modes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Conjunctive: every term must match
    #[default]
    #[serde(alias = "ALL", alias = "AND", alias = "and")]
    All,
    /// Disjunctive: at least one term must match
    #[serde(alias = "ANY", alias = "OR", alias = "or")]
    Any,
}

/// The active filter selections for one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    pub department_acronym: Option<String>,
    pub department_name: Option<String>,
    pub organization_acronym: Option<String>,
    pub organization_name: Option<String>,
    pub require_email: bool,
    pub structure_terms: Vec<String>,
    pub title_terms: Vec<String>,
    pub mode: SearchMode,
    pub global_term: Option<String>,
}

impl Criteria {
    /// The effective selection for a hierarchy field.
    ///
    /// The `"All"` sentinel and the empty string both mean unconstrained.
    pub fn selection(&self, field: HierarchyField) -> Option<&str> {
        let raw = match field {
            HierarchyField::DepartmentAcronym => self.department_acronym.as_deref(),
            HierarchyField::DepartmentName => self.department_name.as_deref(),
            HierarchyField::OrganizationAcronym => self.organization_acronym.as_deref(),
            HierarchyField::OrganizationName => self.organization_name.as_deref(),
        };
        raw.filter(|v| !v.is_empty() && *v != UNCONSTRAINED)
    }

    /// Clear the selection for a hierarchy field
    pub fn clear_selection(&mut self, field: HierarchyField) {
        match field {
            HierarchyField::DepartmentAcronym => self.department_acronym = None,
            HierarchyField::DepartmentName => self.department_name = None,
            HierarchyField::OrganizationAcronym => self.organization_acronym = None,
            HierarchyField::OrganizationName => self.organization_name = None,
        }
    }

    /// Non-empty structure search terms, capped at the term limit
    pub fn active_structure_terms(&self) -> Vec<&str> {
        active_terms(&self.structure_terms)
    }

    /// Non-empty title search terms, capped at the term limit
    pub fn active_title_terms(&self) -> Vec<&str> {
        active_terms(&self.title_terms)
    }

    /// The global any-field search term, if non-empty
    pub fn active_global_term(&self) -> Option<&str> {
        self.global_term.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether at least one non-default filter is set.
    ///
    /// When nothing is active, evaluation must not run; the consumer prompts
    /// the user to apply a filter instead of showing the full table.
    pub fn is_active(&self) -> bool {
        HierarchyField::ALL
            .iter()
            .any(|field| self.selection(*field).is_some())
            || self.require_email
            || !self.active_structure_terms().is_empty()
            || !self.active_title_terms().is_empty()
            || self.active_global_term().is_some()
    }
}

fn active_terms(terms: &[String]) -> Vec<&str> {
    terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .take(MAX_SEARCH_TERMS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_is_inactive() {
        assert!(!Criteria::default().is_active());
    }

    #[test]
    fn sentinel_and_empty_are_unconstrained() {
        let criteria = Criteria {
            department_acronym: Some(UNCONSTRAINED.to_string()),
            department_name: Some(String::new()),
            ..Criteria::default()
        };
        assert_eq!(criteria.selection(HierarchyField::DepartmentAcronym), None);
        assert_eq!(criteria.selection(HierarchyField::DepartmentName), None);
        assert!(!criteria.is_active());
    }

    #[test]
    fn selection_activates_criteria() {
        let criteria = Criteria {
            organization_name: Some("Policy Branch".to_string()),
            ..Criteria::default()
        };
        assert_eq!(
            criteria.selection(HierarchyField::OrganizationName),
            Some("Policy Branch")
        );
        assert!(criteria.is_active());
    }

    #[test]
    fn email_filter_activates_criteria() {
        let criteria = Criteria {
            require_email: true,
            ..Criteria::default()
        };
        assert!(criteria.is_active());
    }

    #[test]
    fn blank_terms_are_ignored() {
        let criteria = Criteria {
            structure_terms: vec![String::new(), String::new()],
            ..Criteria::default()
        };
        assert!(criteria.active_structure_terms().is_empty());
        assert!(!criteria.is_active());
    }

    #[test]
    fn terms_are_capped() {
        let criteria = Criteria {
            title_terms: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..Criteria::default()
        };
        assert_eq!(criteria.active_title_terms(), vec!["a", "b", "c"]);
    }

    #[test]
    fn search_mode_aliases() {
        let all: SearchMode = serde_json::from_str(r#""AND""#).unwrap();
        let any: SearchMode = serde_json::from_str(r#""OR""#).unwrap();
        assert_eq!(all, SearchMode::All);
        assert_eq!(any, SearchMode::Any);
        assert_eq!(
            serde_json::from_str::<SearchMode>(r#""any""#).unwrap(),
            SearchMode::Any
        );
    }
}
