use crate::error::Result;
use crate::table::StatementTable;
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

/// Write both statements as a two-sheet XLSX workbook.
pub fn write_workbook(
    balance_sheet: &StatementTable,
    income_statement: &StatementTable,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Balance General")?;
    write_sheet(sheet, balance_sheet)?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Estado de Resultados")?;
    write_sheet(sheet, income_statement)?;

    workbook.save(path)?;
    info!("Workbook written to {}", path.display());
    Ok(())
}

fn write_sheet(sheet: &mut Worksheet, table: &StatementTable) -> Result<()> {
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    sheet.write_with_format(0, 0, "Cuenta", &header)?;
    for (col, key) in table.columns().iter().enumerate() {
        sheet.write_with_format(0, (col + 1) as u16, key.label(), &header)?;
    }

    for (row, concept) in table.rows().iter().enumerate() {
        sheet.write((row + 1) as u32, 0, concept.name.as_str())?;
        for col in 0..table.columns().len() {
            let value = table.value(&concept.name, col).unwrap_or(0.0);
            sheet.write_number_with_format((row + 1) as u32, (col + 1) as u16, value, &money)?;
        }
    }

    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKey;
    use crate::taxonomy::{StatementKind, Taxonomy};
    use std::collections::BTreeMap;

    #[test]
    fn test_workbook_is_written() {
        let taxonomy = Taxonomy::standard();
        let mut balance = StatementTable::new(
            "Balance General",
            taxonomy.concepts(StatementKind::BalanceSheet),
        );
        let income = StatementTable::new(
            "Estado de Resultados",
            taxonomy.concepts(StatementKind::IncomeStatement),
        );

        let mut values = BTreeMap::new();
        values.insert("Cuentas por cobrar".to_string(), 1500.0);
        balance.add_column(
            ColumnKey {
                source_document: "estado.pdf".to_string(),
                fiscal_year: 2024,
            },
            &values,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("estados.xlsx");
        write_workbook(&balance, &income, &path).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
