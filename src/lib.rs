//! # Financial Statement Extractor
//!
//! A library for turning LLM-extracted financial statements into a
//! normalized, USD-denominated spreadsheet.
//!
//! ## Core Concepts
//!
//! - **Canonical concept**: a standardized statement line item (e.g.
//!   "Cuentas por cobrar") that raw account labels are mapped onto
//! - **Synonym map**: many-to-one, case-insensitive mapping from raw
//!   labels to canonical concepts, per statement
//! - **Aggregation**: values whose labels resolve to the same concept are
//!   summed, never overwritten
//! - **Conversion**: a static (year, currency) table supplies the USD rate
//!
//! The Gemini extraction client lives behind the `gemini` feature; the
//! deterministic pipeline below it has no network dependency.
//!
//! ## Example
//!
//! ```rust,ignore
//! use financial_statement_extractor::*;
//!
//! let processor = StatementProcessor::standard();
//! let processed = processor.process(&reports)?;
//! processed.write_workbook(std::path::Path::new("estados.xlsx"))?;
//! ```

pub mod aggregate;
pub mod convert;
pub mod error;
pub mod export;
pub mod normalize;
pub mod rates;
pub mod schema;
pub mod table;
pub mod taxonomy;

#[cfg(feature = "gemini")]
pub mod llm;

pub use aggregate::{aggregate, aggregate_statement};
pub use convert::convert;
pub use error::{Result, StatementError};
pub use export::write_workbook;
pub use normalize::{coerce, parse_amount, Magnitude, NumericValue};
pub use rates::{ExchangeRateTable, RatePolicy};
pub use schema::*;
pub use table::{format_amount, ColumnKey, StatementTable};
pub use taxonomy::{Concept, Section, StatementKind, Taxonomy, TaxonomyBuilder};

use log::{debug, info};
use std::path::Path;

/// Both statements assembled across all processed reports, one column per
/// (document, year).
#[derive(Debug, Clone)]
pub struct ProcessedStatements {
    pub balance_sheet: StatementTable,
    pub income_statement: StatementTable,
    pub reports: Vec<ConvertedReport>,
}

impl ProcessedStatements {
    pub fn write_workbook(&self, path: &Path) -> Result<()> {
        export::write_workbook(&self.balance_sheet, &self.income_statement, path)
    }
}

/// The deterministic post-extraction pipeline: aggregate each report onto
/// the canonical taxonomy, convert to USD, and assemble the statement
/// tables. The taxonomy and rate table are immutable and held explicitly;
/// there is no process-wide shared state.
pub struct StatementProcessor {
    taxonomy: Taxonomy,
    rates: ExchangeRateTable,
}

impl StatementProcessor {
    pub fn new(taxonomy: Taxonomy, rates: ExchangeRateTable) -> Self {
        Self { taxonomy, rates }
    }

    /// The built-in Spanish taxonomy and rate table with the legacy
    /// fall-back-to-parity rate policy.
    pub fn standard() -> Self {
        Self::new(Taxonomy::standard(), ExchangeRateTable::standard())
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub fn rates(&self) -> &ExchangeRateTable {
        &self.rates
    }

    pub fn process(&self, reports: &[ExtractedReport]) -> Result<ProcessedStatements> {
        info!("Processing {} extracted report(s)", reports.len());

        let mut balance_sheet = StatementTable::new(
            "Balance General",
            self.taxonomy.concepts(StatementKind::BalanceSheet),
        );
        let mut income_statement = StatementTable::new(
            "Estado de Resultados",
            self.taxonomy.concepts(StatementKind::IncomeStatement),
        );
        let mut converted_reports = Vec::with_capacity(reports.len());

        for report in reports {
            debug!(
                "Aggregating '{}' ({} {})",
                report.source_document, report.currency, report.fiscal_year
            );
            let aggregated = aggregate(report, &self.taxonomy);
            let converted = convert(&aggregated, &self.rates)?;

            let key = ColumnKey {
                source_document: converted.source_document.clone(),
                fiscal_year: converted.fiscal_year,
            };
            balance_sheet.add_column(key.clone(), &converted.balance_sheet);
            income_statement.add_column(key, &converted.income_statement);
            converted_reports.push(converted);
        }

        Ok(ProcessedStatements {
            balance_sheet,
            income_statement,
            reports: converted_reports,
        })
    }
}

/// Process reports with the built-in taxonomy and rate table.
pub fn process_statements(reports: &[ExtractedReport]) -> Result<ProcessedStatements> {
    StatementProcessor::standard().process(reports)
}
