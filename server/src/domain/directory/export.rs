//! CSV export of a filtered subset
//!
//! Column order is fixed by the export contract; absent fields serialize as
//! empty strings. Quoting follows RFC 4180 (fields containing the delimiter,
//! quotes, or line breaks are quoted, with embedded quotes doubled).

use super::record::Record;

/// Export column order, fixed by the download contract
pub const EXPORT_COLUMNS: [&str; 7] = [
    "given_name",
    "surname",
    "title",
    "email",
    "department_name",
    "organization_name",
    "organization_structure",
];

/// Suggested filename for the download attachment
pub const EXPORT_FILENAME: &str = "directory_filtered.csv";

/// Serialize rows to CSV with a header line
pub fn to_csv(rows: &[&Record]) -> String {
    let mut out = String::new();
    out.push_str(&EXPORT_COLUMNS.join(","));
    out.push('\n');
    for record in rows {
        let values = export_values(record);
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            push_field(&mut out, value.unwrap_or(""));
        }
        out.push('\n');
    }
    out
}

fn export_values(record: &Record) -> [Option<&str>; 7] {
    [
        record.given_name.as_deref(),
        record.surname.as_deref(),
        record.title.as_deref(),
        record.email.as_deref(),
        record.department_name.as_deref(),
        record.organization_name.as_deref(),
        record.organization_structure.as_deref(),
    ]
}

fn push_field(out: &mut String, value: &str) {
    if value.contains([',', '"', '\n', '\r']) {
        out.push('"');
        for c in value.chars() {
            if c == '"' {
                out.push('"');
            }
            out.push(c);
        }
        out.push('"');
    } else {
        out.push_str(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_matches_export_contract() {
        let csv = to_csv(&[]);
        assert_eq!(
            csv,
            "given_name,surname,title,email,department_name,organization_name,organization_structure\n"
        );
    }

    #[test]
    fn missing_fields_serialize_empty() {
        let record = Record {
            surname: Some("Singh".to_string()),
            ..Record::default()
        };
        let csv = to_csv(&[&record]);
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, ",Singh,,,,,");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let record = Record {
            given_name: Some("Anne, Marie".to_string()),
            surname: Some("O'Brien \"Obie\"".to_string()),
            title: Some("Director\nGeneral".to_string()),
            ..Record::default()
        };
        let csv = to_csv(&[&record]);
        assert!(csv.contains(r#""Anne, Marie""#));
        assert!(csv.contains(r#""O'Brien ""Obie""""#));
        assert!(csv.contains("\"Director\nGeneral\""));
    }

    #[test]
    fn rows_keep_their_order() {
        let first = Record {
            surname: Some("A".to_string()),
            ..Record::default()
        };
        let second = Record {
            surname: Some("B".to_string()),
            ..Record::default()
        };
        let csv = to_csv(&[&first, &second]);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], ",A,,,,,");
        assert_eq!(lines[2], ",B,,,,,");
    }
}
