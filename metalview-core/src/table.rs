//! Fixed-width report tables.
//!
//! Renders sequences of loosely-typed row records as aligned text tables:
//! a header line, an optional underline, then one line per record. Columns
//! are declared once as (heading, key, width) descriptors and the resulting
//! formatter is reused across report sections.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::error::{MetalViewError, Result};

/// A row record: field name to display value.
///
/// Values are coerced to text at render time. Missing keys and `null`
/// values render as empty cells, which tolerates optional upstream fields
/// such as an unnamed VLAN.
pub type Row = HashMap<String, Value>;

/// One column descriptor.
#[derive(Debug, Clone)]
pub struct Column {
    /// Display label for the header line.
    pub heading: String,
    /// Field name looked up in each row record.
    pub key: String,
    /// Column width in characters.
    pub width: usize,
}

impl Column {
    pub fn new(heading: impl Into<String>, key: impl Into<String>, width: usize) -> Self {
        Self {
            heading: heading.into(),
            key: key.into(),
            width,
        }
    }
}

/// Fixed-width table formatter.
///
/// Validated once at construction, then reusable: [`TableFormatter::render`]
/// is a pure function of the column specification and the rows, so one
/// formatter instance can safely be shared across callers.
///
/// Cell values are truncated to the column width by raw character count and
/// right-padded with spaces, so every rendered line has the same total
/// width. Values containing the separator are not escaped.
#[derive(Debug, Clone)]
pub struct TableFormatter {
    columns: Vec<Column>,
    separator: String,
    underline: Option<char>,
}

impl TableFormatter {
    /// Create a formatter for the given column specification, with a single
    /// space separator and no header underline.
    ///
    /// # Errors
    ///
    /// Returns [`MetalViewError::InvalidTableSpec`] if any column width is
    /// zero or a key appears more than once.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if column.width == 0 {
                return Err(MetalViewError::InvalidTableSpec(format!(
                    "column '{}' has zero width",
                    column.key
                )));
            }
            if !seen.insert(column.key.as_str()) {
                return Err(MetalViewError::InvalidTableSpec(format!(
                    "duplicate column key '{}'",
                    column.key
                )));
            }
        }

        Ok(Self {
            columns,
            separator: " ".to_string(),
            underline: None,
        })
    }

    /// Set the string inserted between columns.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Underline the header with the given character.
    pub fn with_underline(mut self, underline: char) -> Self {
        self.underline = Some(underline);
        self
    }

    /// Render the rows as a text block: header line, underline line if
    /// configured, then one line per record. Lines are joined with `\n` and
    /// carry no trailing newline.
    pub fn render(&self, rows: &[Row]) -> String {
        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(self.line(|column| column.heading.clone()));
        if let Some(underline) = self.underline {
            lines.push(self.line(|column| underline.to_string().repeat(column.width)));
        }
        for row in rows {
            lines.push(self.line(|column| {
                row.get(&column.key).map(display_text).unwrap_or_default()
            }));
        }
        lines.join("\n")
    }

    fn line<F>(&self, cell_value: F) -> String
    where
        F: Fn(&Column) -> String,
    {
        self.columns
            .iter()
            .map(|column| pad_cell(&cell_value(column), column.width))
            .collect::<Vec<_>>()
            .join(&self.separator)
    }
}

/// Truncate to `width` characters, then right-pad with spaces to exactly
/// `width`. Truncation counts chars, not display width.
fn pad_cell(value: &str, width: usize) -> String {
    let truncated: String = value.chars().take(width).collect();
    format!("{truncated:<width$}")
}

/// Text form of a cell value: strings render bare, `null` renders empty,
/// everything else takes its JSON text form.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name_age_columns() -> Vec<Column> {
        vec![Column::new("Name", "name", 4), Column::new("Age", "age", 3)]
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_truncation_padding_and_missing_keys() {
        let formatter = TableFormatter::new(name_age_columns())
            .unwrap()
            .with_underline('=');

        let rows = vec![
            row(&[("name", json!("Bob")), ("age", json!(30))]),
            row(&[("name", json!("Alexandra"))]),
        ];

        let rendered = formatter.render(&rows);
        let lines: Vec<&str> = rendered.split('\n').collect();

        assert_eq!(lines, vec!["Name Age", "==== ===", "Bob  30 ", "Alex    "]);
    }

    #[test]
    fn test_all_lines_share_total_width() {
        let formatter = TableFormatter::new(name_age_columns())
            .unwrap()
            .with_underline('=');

        let rows = vec![
            row(&[("name", json!("a"))]),
            row(&[("name", json!("a much longer value")), ("age", json!(10000))]),
        ];

        for line in formatter.render(&rows).split('\n') {
            assert_eq!(line.chars().count(), 8, "line {:?}", line);
        }
    }

    #[test]
    fn test_empty_rows_renders_header_only() {
        let formatter = TableFormatter::new(name_age_columns()).unwrap();
        assert_eq!(formatter.render(&[]), "Name Age");

        let underlined = TableFormatter::new(name_age_columns())
            .unwrap()
            .with_underline('-');
        assert_eq!(underlined.render(&[]), "Name Age\n---- ---");
    }

    #[test]
    fn test_no_trailing_newline() {
        let formatter = TableFormatter::new(name_age_columns()).unwrap();
        let rendered = formatter.render(&[row(&[("name", json!("Bob"))])]);
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_missing_key_renders_all_space_field() {
        let formatter = TableFormatter::new(name_age_columns()).unwrap();
        let rendered = formatter.render(&[Row::new()]);
        let data_line = rendered.split('\n').nth(1).unwrap();
        assert_eq!(data_line, "        ");
    }

    #[test]
    fn test_null_value_renders_empty() {
        let formatter = TableFormatter::new(name_age_columns()).unwrap();
        let rendered = formatter.render(&[row(&[("name", Value::Null), ("age", json!(7))])]);
        assert_eq!(rendered.split('\n').nth(1).unwrap(), "     7  ");
    }

    #[test]
    fn test_non_string_values_take_canonical_text_form() {
        let columns = vec![
            Column::new("N", "n", 6),
            Column::new("B", "b", 5),
            Column::new("F", "f", 5),
        ];
        let formatter = TableFormatter::new(columns).unwrap();
        let rendered = formatter.render(&[row(&[
            ("n", json!(1200)),
            ("b", json!(true)),
            ("f", json!(2.5)),
        ])]);
        assert_eq!(rendered.split('\n').nth(1).unwrap(), "1200   true  2.5  ");
    }

    #[test]
    fn test_custom_separator_and_unescaped_values() {
        let formatter = TableFormatter::new(name_age_columns())
            .unwrap()
            .with_separator(" | ");

        let rendered = formatter.render(&[row(&[("name", json!("a|b")), ("age", json!(1))])]);
        let lines: Vec<&str> = rendered.split('\n').collect();
        assert_eq!(lines[0], "Name | Age");
        // Separator characters inside a value are rendered as-is.
        assert_eq!(lines[1], "a|b  | 1  ");
    }

    #[test]
    fn test_header_heading_is_truncated_like_a_value() {
        let columns = vec![Column::new("Identifier", "id", 4)];
        let formatter = TableFormatter::new(columns).unwrap();
        assert_eq!(formatter.render(&[]), "Iden");
    }

    #[test]
    fn test_zero_width_rejected() {
        let columns = vec![Column::new("Name", "name", 0)];
        match TableFormatter::new(columns) {
            Err(MetalViewError::InvalidTableSpec(msg)) => assert!(msg.contains("zero width")),
            other => panic!("Expected InvalidTableSpec, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let columns = vec![
            Column::new("Name", "name", 4),
            Column::new("Nickname", "name", 8),
        ];
        match TableFormatter::new(columns) {
            Err(MetalViewError::InvalidTableSpec(msg)) => assert!(msg.contains("duplicate")),
            other => panic!("Expected InvalidTableSpec, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_render_is_deterministic_and_formatter_is_reusable() {
        let formatter = TableFormatter::new(name_age_columns())
            .unwrap()
            .with_underline('=');
        let rows = vec![row(&[("name", json!("Bob")), ("age", json!(30))])];

        let first = formatter.render(&rows);
        let second = formatter.render(&rows);
        assert_eq!(first, second);

        // A second, unrelated render on the same instance is unaffected.
        assert_eq!(formatter.render(&[]), "Name Age\n==== ===");
        assert_eq!(formatter.render(&rows), first);
    }

    #[test]
    fn test_multichar_truncation_counts_chars() {
        let columns = vec![Column::new("V", "v", 3)];
        let formatter = TableFormatter::new(columns).unwrap();
        // Truncation is by character count, not bytes.
        let rendered = formatter.render(&[row(&[("v", json!("héllo"))])]);
        assert_eq!(rendered.split('\n').nth(1).unwrap(), "hél");
    }
}
