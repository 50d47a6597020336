use crate::error::Result;
use crate::rates::ExchangeRateTable;
use crate::schema::{AggregatedReport, ConvertedReport};
use log::info;
use std::collections::BTreeMap;

/// Convert an aggregated report to USD.
///
/// One rate lookup per report (the document declares a single currency);
/// every value in both statements is multiplied by it. A rate of 1.0
/// leaves the report unchanged. Under [`RatePolicy::Strict`] a missing
/// rate propagates as an error.
///
/// [`RatePolicy::Strict`]: crate::rates::RatePolicy::Strict
pub fn convert(report: &AggregatedReport, rates: &ExchangeRateTable) -> Result<ConvertedReport> {
    let rate = rates.rate(&report.currency, report.fiscal_year)?;
    info!(
        "Converting '{}' ({} {}) to USD at rate {}",
        report.source_document, report.currency, report.fiscal_year, rate
    );

    Ok(ConvertedReport {
        source_document: report.source_document.clone(),
        fiscal_year: report.fiscal_year,
        currency: report.currency.clone(),
        rate,
        balance_sheet: scale_values(&report.balance_sheet, rate),
        income_statement: scale_values(&report.income_statement, rate),
    })
}

fn scale_values(values: &BTreeMap<String, f64>, rate: f64) -> BTreeMap<String, f64> {
    values
        .iter()
        .map(|(name, value)| (name.clone(), value * rate))
        .collect()
}
