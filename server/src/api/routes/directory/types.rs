//! Directory API request/response types

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::core::constants::MAX_TERM_LENGTH;
use crate::domain::directory::{Criteria, Record, SearchMode, SearchOutcome};

/// Filter and search selections for one evaluation
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SearchRequest {
    pub department_acronym: Option<String>,
    pub department_name: Option<String>,
    pub organization_acronym: Option<String>,
    pub organization_name: Option<String>,
    /// Keep only rows with a non-empty email
    pub require_email: bool,
    /// Substring terms matched against the organization structure field
    #[validate(length(max = 3), custom(function = "validate_terms"))]
    pub structure_terms: Vec<String>,
    /// Substring terms matched against the title field
    #[validate(length(max = 3), custom(function = "validate_terms"))]
    pub title_terms: Vec<String>,
    /// Term combination mode shared by both term searches
    pub mode: SearchMode,
    /// Any-field substring search, always disjunctive over fields
    #[validate(custom(function = "validate_global_term"))]
    pub global_term: Option<String>,
}

impl SearchRequest {
    pub fn into_criteria(self) -> Criteria {
        Criteria {
            department_acronym: self.department_acronym,
            department_name: self.department_name,
            organization_acronym: self.organization_acronym,
            organization_name: self.organization_name,
            require_email: self.require_email,
            structure_terms: self.structure_terms,
            title_terms: self.title_terms,
            mode: self.mode,
            global_term: self.global_term,
        }
    }
}

fn validate_terms(terms: &[String]) -> Result<(), ValidationError> {
    for term in terms {
        if term.len() > MAX_TERM_LENGTH {
            return Err(ValidationError::new("term_too_long")
                .with_message(format!("Term too long (max {} chars)", MAX_TERM_LENGTH).into()));
        }
    }
    Ok(())
}

fn validate_global_term(term: &str) -> Result<(), ValidationError> {
    if term.len() > MAX_TERM_LENGTH {
        return Err(ValidationError::new("term_too_long")
            .with_message(format!("Term too long (max {} chars)", MAX_TERM_LENGTH).into()));
    }
    Ok(())
}

/// Query parameters for candidate value derivation
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct OptionsQuery {
    pub department_acronym: Option<String>,
    pub department_name: Option<String>,
    pub organization_acronym: Option<String>,
}

impl OptionsQuery {
    pub fn into_criteria(self) -> Criteria {
        Criteria {
            department_acronym: self.department_acronym,
            department_name: self.department_name,
            organization_acronym: self.organization_acronym,
            ..Criteria::default()
        }
    }
}

/// Candidate values for one selector
#[derive(Debug, Serialize, ToSchema)]
pub struct OptionsResponse {
    pub field: String,
    pub values: Vec<String>,
}

/// Outcome classification of a search evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// No filter active; nothing is evaluated
    NoFilter,
    /// Result exceeds the render cap; only the count is reported
    TooLarge,
    /// Filters are active but nothing matched
    Empty,
    Ok,
}

/// Search evaluation result
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    pub status: SearchStatus,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Record>>,
}

impl SearchResponse {
    pub fn from_outcome(outcome: SearchOutcome<'_>) -> Self {
        match outcome {
            SearchOutcome::NoFilter => Self {
                status: SearchStatus::NoFilter,
                count: 0,
                rows: None,
            },
            SearchOutcome::TooLarge { count } => Self {
                status: SearchStatus::TooLarge,
                count,
                rows: None,
            },
            SearchOutcome::Empty => Self {
                status: SearchStatus::Empty,
                count: 0,
                rows: None,
            },
            SearchOutcome::Rows(rows) => Self {
                status: SearchStatus::Ok,
                count: rows.len(),
                rows: Some(rows.into_iter().cloned().collect()),
            },
        }
    }
}

/// Persist the current filtered subset to a warehouse table
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveRequest {
    /// Destination table name
    #[validate(length(min = 1, max = 64))]
    pub table_name: String,
    /// The filter selections whose result should be persisted
    #[validate(nested)]
    #[serde(default)]
    pub criteria: SearchRequest,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaveResponse {
    pub table_name: String,
    pub created: bool,
    pub rows_written: usize,
}

/// Snapshot metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct SnapshotResponse {
    pub source: String,
    pub rows: usize,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_defaults() {
        let request: SearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.validate().is_ok());
        let criteria = request.into_criteria();
        assert!(!criteria.is_active());
        assert_eq!(criteria.mode, SearchMode::All);
    }

    #[test]
    fn mode_aliases_deserialize() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"mode": "OR", "title_terms": ["analyst"]}"#).unwrap();
        assert_eq!(request.mode, SearchMode::Any);
    }

    #[test]
    fn too_many_terms_fail_validation() {
        let request = SearchRequest {
            structure_terms: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..SearchRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn over_long_term_fails_validation() {
        let request = SearchRequest {
            title_terms: vec!["x".repeat(MAX_TERM_LENGTH + 1)],
            ..SearchRequest::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn save_request_validates_table_name_length() {
        let request = SaveRequest {
            table_name: String::new(),
            criteria: SearchRequest::default(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn ok_outcome_carries_rows() {
        let record = Record {
            surname: Some("Khan".to_string()),
            ..Record::default()
        };
        let response = SearchResponse::from_outcome(SearchOutcome::Rows(vec![&record]));
        assert_eq!(response.status, SearchStatus::Ok);
        assert_eq!(response.count, 1);
        assert_eq!(response.rows.unwrap()[0].surname.as_deref(), Some("Khan"));
    }

    #[test]
    fn non_row_outcomes_omit_rows() {
        for (outcome, status) in [
            (SearchOutcome::NoFilter, SearchStatus::NoFilter),
            (SearchOutcome::Empty, SearchStatus::Empty),
            (SearchOutcome::TooLarge { count: 123456 }, SearchStatus::TooLarge),
        ] {
            let response = SearchResponse::from_outcome(outcome);
            assert_eq!(response.status, status);
            assert!(response.rows.is_none());
        }
    }
}
