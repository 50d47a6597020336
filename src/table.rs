use crate::taxonomy::Concept;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies one column of a statement table: one source document in one
/// fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnKey {
    pub source_document: String,
    pub fiscal_year: i32,
}

impl ColumnKey {
    pub fn label(&self) -> String {
        format!("{} ({})", self.source_document, self.fiscal_year)
    }
}

/// A row-indexed view of one statement: rows are the canonical concepts in
/// taxonomy order, columns are (document, year) pairs in the order they
/// were added, cells default to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementTable {
    title: String,
    rows: Vec<Concept>,
    columns: Vec<ColumnKey>,
    /// cells[column][row], parallel to `columns` and `rows`.
    cells: Vec<Vec<f64>>,
}

impl StatementTable {
    pub fn new(title: &str, concepts: &[Concept]) -> Self {
        Self {
            title: title.to_string(),
            rows: concepts.to_vec(),
            columns: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[Concept] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    /// Append a column; concepts missing from `values` render as zero.
    pub fn add_column(&mut self, key: ColumnKey, values: &BTreeMap<String, f64>) {
        let column = self
            .rows
            .iter()
            .map(|concept| values.get(&concept.name).copied().unwrap_or(0.0))
            .collect();
        self.columns.push(key);
        self.cells.push(column);
    }

    pub fn value(&self, concept_name: &str, column: usize) -> Option<f64> {
        let row = self.rows.iter().position(|c| c.name == concept_name)?;
        self.cells.get(column).map(|col| col[row])
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Cuenta");
        for key in &self.columns {
            output.push_str(&format!(",{}", key.label()));
        }
        output.push('\n');

        for (row, concept) in self.rows.iter().enumerate() {
            output.push_str(&concept.name);
            for column in &self.cells {
                output.push_str(&format!(",{:.2}", column[row]));
            }
            output.push('\n');
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = format!("## {}\n\n", self.title);

        output.push_str("| Cuenta |");
        for key in &self.columns {
            output.push_str(&format!(" {} |", key.label()));
        }
        output.push('\n');

        output.push_str("|---|");
        for _ in &self.columns {
            output.push_str("---:|");
        }
        output.push('\n');

        for (row, concept) in self.rows.iter().enumerate() {
            output.push_str(&format!("| {} |", concept.name));
            for column in &self.cells {
                output.push_str(&format!(" {} |", format_amount(column[row])));
            }
            output.push('\n');
        }

        output
    }
}

/// Format a monetary value with thousands separators and two decimals.
pub fn format_amount(value: f64) -> String {
    let total_cents = (value.abs() * 100.0).round() as i64;
    let whole = total_cents / 100;
    let cents = total_cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Section;

    fn concepts() -> Vec<Concept> {
        vec![
            Concept {
                name: "Efectivo".to_string(),
                section: Section::Assets,
            },
            Concept {
                name: "Proveedores".to_string(),
                section: Section::Liabilities,
            },
        ]
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234567.891), "1,234,567.89");
        assert_eq!(format_amount(0.24), "0.24");
        assert_eq!(format_amount(-500.0), "-500.00");
        assert_eq!(format_amount(1000.0), "1,000.00");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn test_columns_default_missing_concepts_to_zero() {
        let mut table = StatementTable::new("Balance General", &concepts());
        let mut values = BTreeMap::new();
        values.insert("Efectivo".to_string(), 42.0);
        table.add_column(
            ColumnKey {
                source_document: "a.pdf".to_string(),
                fiscal_year: 2024,
            },
            &values,
        );

        assert_eq!(table.value("Efectivo", 0), Some(42.0));
        assert_eq!(table.value("Proveedores", 0), Some(0.0));
        assert_eq!(table.value("Inexistente", 0), None);
    }

    #[test]
    fn test_columns_keep_insertion_order() {
        let mut table = StatementTable::new("Balance General", &concepts());
        for (doc, year) in [("b.pdf", 2023), ("a.pdf", 2024)] {
            table.add_column(
                ColumnKey {
                    source_document: doc.to_string(),
                    fiscal_year: year,
                },
                &BTreeMap::new(),
            );
        }

        let labels: Vec<String> = table.columns().iter().map(ColumnKey::label).collect();
        assert_eq!(labels, vec!["b.pdf (2023)", "a.pdf (2024)"]);
    }

    #[test]
    fn test_csv_rendering() {
        let mut table = StatementTable::new("Balance General", &concepts());
        let mut values = BTreeMap::new();
        values.insert("Efectivo".to_string(), 1250.5);
        table.add_column(
            ColumnKey {
                source_document: "a.pdf".to_string(),
                fiscal_year: 2024,
            },
            &values,
        );

        let csv = table.to_csv();
        assert!(csv.starts_with("Cuenta,a.pdf (2024)\n"));
        assert!(csv.contains("Efectivo,1250.50"));
        assert!(csv.contains("Proveedores,0.00"));
    }

    #[test]
    fn test_markdown_rendering_uses_formatted_amounts() {
        let mut table = StatementTable::new("Balance General", &concepts());
        let mut values = BTreeMap::new();
        values.insert("Efectivo".to_string(), 1234567.0);
        table.add_column(
            ColumnKey {
                source_document: "a.pdf".to_string(),
                fiscal_year: 2024,
            },
            &values,
        );

        let markdown = table.to_markdown();
        assert!(markdown.contains("## Balance General"));
        assert!(markdown.contains("1,234,567.00"));
    }
}
