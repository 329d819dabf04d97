//! Personnel record and field definitions
//!
//! A record is one row of the loaded directory table. Every attribute is an
//! optional string: `None` means the warehouse had no value for the column,
//! which is distinct from an empty string.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the personnel directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub department_acronym: Option<String>,
    pub department_name: Option<String>,
    pub organization_acronym: Option<String>,
    pub organization_name: Option<String>,
    pub organization_structure: Option<String>,
}

impl Record {
    /// Warehouse column names, in load and persistence order
    pub const COLUMNS: [&'static str; 9] = [
        "given_name",
        "surname",
        "title",
        "email",
        "department_acronym",
        "department_name",
        "organization_acronym",
        "organization_name",
        "organization_structure",
    ];

    /// All fields with their string values, for global any-field search.
    ///
    /// The field set is fixed and iterated explicitly; nothing reflects over
    /// row structure.
    pub fn fields(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("given_name", self.given_name.as_deref()),
            ("surname", self.surname.as_deref()),
            ("title", self.title.as_deref()),
            ("email", self.email.as_deref()),
            ("department_acronym", self.department_acronym.as_deref()),
            ("department_name", self.department_name.as_deref()),
            ("organization_acronym", self.organization_acronym.as_deref()),
            ("organization_name", self.organization_name.as_deref()),
            (
                "organization_structure",
                self.organization_structure.as_deref(),
            ),
        ]
    }
}

/// The four hierarchical selector fields, broadest to narrowest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyField {
    DepartmentAcronym,
    DepartmentName,
    OrganizationAcronym,
    OrganizationName,
}

impl HierarchyField {
    /// All hierarchy fields in filter application order (broadest first)
    pub const ALL: [HierarchyField; 4] = [
        HierarchyField::DepartmentAcronym,
        HierarchyField::DepartmentName,
        HierarchyField::OrganizationAcronym,
        HierarchyField::OrganizationName,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            HierarchyField::DepartmentAcronym => "department_acronym",
            HierarchyField::DepartmentName => "department_name",
            HierarchyField::OrganizationAcronym => "organization_acronym",
            HierarchyField::OrganizationName => "organization_name",
        }
    }

    /// Parse an API field name into a hierarchy field
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "department_acronym" => Some(HierarchyField::DepartmentAcronym),
            "department_name" => Some(HierarchyField::DepartmentName),
            "organization_acronym" => Some(HierarchyField::OrganizationAcronym),
            "organization_name" => Some(HierarchyField::OrganizationName),
            _ => None,
        }
    }

    /// The value of this field on a record
    pub fn value<'a>(&self, record: &'a Record) -> Option<&'a str> {
        match self {
            HierarchyField::DepartmentAcronym => record.department_acronym.as_deref(),
            HierarchyField::DepartmentName => record.department_name.as_deref(),
            HierarchyField::OrganizationAcronym => record.organization_acronym.as_deref(),
            HierarchyField::OrganizationName => record.organization_name.as_deref(),
        }
    }

    /// Broader selectors whose current selection constrains this field's
    /// candidate list, most specific first. Candidate derivation applies the
    /// first one that is constrained.
    pub const fn ancestors(&self) -> &'static [HierarchyField] {
        match self {
            HierarchyField::DepartmentAcronym => &[],
            HierarchyField::DepartmentName => &[HierarchyField::DepartmentAcronym],
            HierarchyField::OrganizationAcronym => &[
                HierarchyField::DepartmentName,
                HierarchyField::DepartmentAcronym,
            ],
            HierarchyField::OrganizationName => &[
                HierarchyField::OrganizationAcronym,
                HierarchyField::DepartmentName,
                HierarchyField::DepartmentAcronym,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_fields() {
        for field in HierarchyField::ALL {
            assert_eq!(HierarchyField::parse(field.as_str()), Some(field));
        }
    }

    #[test]
    fn parse_unknown_field() {
        assert_eq!(HierarchyField::parse("email"), None);
        assert_eq!(HierarchyField::parse(""), None);
        assert_eq!(HierarchyField::parse("DEPARTMENT_ACRONYM"), None);
    }

    #[test]
    fn ancestors_most_specific_first() {
        assert!(HierarchyField::DepartmentAcronym.ancestors().is_empty());
        assert_eq!(
            HierarchyField::OrganizationName.ancestors()[0],
            HierarchyField::OrganizationAcronym
        );
        assert_eq!(
            HierarchyField::OrganizationAcronym.ancestors(),
            &[
                HierarchyField::DepartmentName,
                HierarchyField::DepartmentAcronym
            ]
        );
    }

    #[test]
    fn fields_cover_every_column() {
        let record = Record::default();
        let names: Vec<&str> = record.fields().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, Record::COLUMNS);
    }
}
