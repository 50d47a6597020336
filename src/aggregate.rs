use crate::normalize::{coerce, NumericValue};
use crate::schema::{AggregatedReport, ExtractedReport};
use crate::taxonomy::{StatementKind, Taxonomy};
use log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Map a raw extracted report onto the canonical concept set.
///
/// Every leaf of the (possibly nested) statement maps is coerced to a
/// number, scaled by the report's magnitude, resolved through the synonym
/// map and **added** into its canonical bucket. Two raw accounts that
/// resolve to the same concept therefore sum rather than overwrite.
/// Unmapped and unparseable accounts are logged and excluded; the
/// accumulator starts at zero for every concept, so aggregation never
/// fails.
pub fn aggregate(report: &ExtractedReport, taxonomy: &Taxonomy) -> AggregatedReport {
    let factor = report.magnitude.factor();

    AggregatedReport {
        source_document: report.source_document.clone(),
        fiscal_year: report.fiscal_year,
        currency: report.currency.clone(),
        balance_sheet: aggregate_statement(
            &report.balance_sheet,
            StatementKind::BalanceSheet,
            taxonomy,
            factor,
        ),
        income_statement: aggregate_statement(
            &report.income_statement,
            StatementKind::IncomeStatement,
            taxonomy,
            factor,
        ),
    }
}

/// Aggregate one raw statement body into zero-initialized concept buckets.
pub fn aggregate_statement(
    raw: &Map<String, Value>,
    kind: StatementKind,
    taxonomy: &Taxonomy,
    scale_factor: f64,
) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = taxonomy
        .concepts(kind)
        .iter()
        .map(|concept| (concept.name.clone(), 0.0))
        .collect();

    walk(raw, kind, taxonomy, scale_factor, &mut totals);
    totals
}

fn walk(
    map: &Map<String, Value>,
    kind: StatementKind,
    taxonomy: &Taxonomy,
    scale_factor: f64,
    totals: &mut BTreeMap<String, f64>,
) {
    for (label, value) in map {
        if let Value::Object(nested) = value {
            walk(nested, kind, taxonomy, scale_factor, totals);
            continue;
        }

        match coerce(value) {
            NumericValue::Number(amount) => match taxonomy.resolve(kind, label) {
                Some(canonical) => {
                    debug!("'{}' -> '{}': {}", label, canonical, amount);
                    if let Some(total) = totals.get_mut(canonical) {
                        *total += amount * scale_factor;
                    }
                }
                None => warn!("Unmapped account '{}' dropped from aggregation", label),
            },
            NumericValue::Unparseable => {
                warn!("Account '{}' has a non-numeric value; dropped", label)
            }
            NumericValue::Absent => debug!("Account '{}' has no value; skipped", label),
        }
    }
}
