use crate::normalize::Magnitude;
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The JSON object shape the extraction prompt instructs the model to
/// return. This is a soft contract: every field defaults so that a
/// partially-conforming response still deserializes, and the statement
/// bodies stay untyped maps because real documents nest accounts
/// arbitrarily.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExtractionResponse {
    #[serde(rename = "Moneda", default)]
    #[schemars(description = "ISO 4217 currency code of the statement figures, e.g. COP or USD")]
    pub currency: String,

    #[serde(rename = "Unidad", default)]
    #[schemars(description = "Magnitude the figures are expressed in: unidades, miles or millones")]
    pub unit: String,

    #[serde(rename = "ReportesPorAnio", default)]
    #[schemars(description = "One entry per fiscal year found in the document")]
    pub reports_by_year: Vec<YearReport>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct YearReport {
    #[serde(rename = "Anio", default)]
    #[schemars(description = "Fiscal year as a string, e.g. \"2024\"")]
    pub year: String,

    #[serde(rename = "BalanceGeneral", default)]
    #[schemars(description = "Balance sheet accounts with their values, possibly nested by section")]
    pub balance_sheet: Map<String, Value>,

    #[serde(rename = "EstadoResultados", default)]
    #[schemars(description = "Income statement accounts with their values, possibly nested by section")]
    pub income_statement: Map<String, Value>,
}

impl ExtractionResponse {
    /// Fan out the per-year reports of one model response.
    ///
    /// Years the model returned in an unparseable form drop that year's
    /// report with a warning; the remaining years survive.
    pub fn into_reports(self, source_document: &str) -> Vec<ExtractedReport> {
        let currency = if self.currency.trim().is_empty() {
            warn!(
                "Response for '{}' carries no currency; assuming USD",
                source_document
            );
            "USD".to_string()
        } else {
            self.currency.trim().to_uppercase()
        };
        let magnitude = Magnitude::parse(&self.unit);

        let mut reports = Vec::new();
        for year_report in self.reports_by_year {
            let fiscal_year = match year_report.year.trim().parse::<i32>() {
                Ok(year) => year,
                Err(_) => {
                    warn!(
                        "Dropping year report with unparseable year '{}' from '{}'",
                        year_report.year, source_document
                    );
                    continue;
                }
            };

            reports.push(ExtractedReport {
                source_document: source_document.to_string(),
                fiscal_year,
                currency: currency.clone(),
                magnitude,
                balance_sheet: year_report.balance_sheet,
                income_statement: year_report.income_statement,
            });
        }
        reports
    }
}

/// One document/year pairing as it came out of the model, before any
/// synonym mapping. Transient: it flows through aggregation and conversion
/// within a single run and is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedReport {
    pub source_document: String,
    pub fiscal_year: i32,
    pub currency: String,
    pub magnitude: Magnitude,
    pub balance_sheet: Map<String, Value>,
    pub income_statement: Map<String, Value>,
}

/// The same report after synonym mapping and summation: every canonical
/// concept is present, zero when nothing mapped to it. Values are already
/// scaled to plain units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub source_document: String,
    pub fiscal_year: i32,
    pub currency: String,
    pub balance_sheet: BTreeMap<String, f64>,
    pub income_statement: BTreeMap<String, f64>,
}

/// An [`AggregatedReport`] with every value multiplied by the USD rate that
/// applied to its currency and fiscal year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertedReport {
    pub source_document: String,
    pub fiscal_year: i32,
    pub currency: String,
    pub rate: f64,
    pub balance_sheet: BTreeMap<String, f64>,
    pub income_statement: BTreeMap<String, f64>,
}
