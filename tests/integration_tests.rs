use financial_statement_extractor::*;
use serde_json::json;

fn extracted_report(
    document: &str,
    year: i32,
    currency: &str,
    magnitude: Magnitude,
    balance: serde_json::Value,
    income: serde_json::Value,
) -> ExtractedReport {
    ExtractedReport {
        source_document: document.to_string(),
        fiscal_year: year,
        currency: currency.to_string(),
        magnitude,
        balance_sheet: balance.as_object().cloned().unwrap_or_default(),
        income_statement: income.as_object().cloned().unwrap_or_default(),
    }
}

#[test]
fn test_worked_example_cop_2024() {
    // Raw account {"Caja y Bancos": 1000}, COP, 2024: aggregates to
    // "Efectivo y equivalentes de efectivo" = 1000, converts at 0.00024.
    let report = extracted_report(
        "estado_financiero.pdf",
        2024,
        "COP",
        Magnitude::Units,
        json!({"Caja y Bancos": 1000}),
        json!({}),
    );

    let processor = StatementProcessor::standard();

    let aggregated = aggregate(&report, processor.taxonomy());
    assert_eq!(
        aggregated.balance_sheet["Efectivo y equivalentes de efectivo"],
        1000.0
    );

    let converted = convert(&aggregated, processor.rates()).unwrap();
    assert_eq!(converted.rate, 0.00024);
    assert!(
        (converted.balance_sheet["Efectivo y equivalentes de efectivo"] - 0.24).abs() < 1e-12
    );
}

#[test]
fn test_full_response_to_workbook() -> anyhow::Result<()> {
    let raw = json!({
        "Moneda": "COP",
        "Unidad": "miles",
        "ReportesPorAnio": [
            {
                "Anio": "2023",
                "BalanceGeneral": {
                    "Activo": {
                        "Caja": 120,
                        "Bancos": "380",
                        "Clientes": "1,200"
                    },
                    "Pasivo": {
                        "Proveedores": "(450)"
                    }
                },
                "EstadoResultados": {
                    "Ventas": "5,000",
                    "Costo de Mercancía Vendida": "(3,000)"
                }
            },
            {
                "Anio": "2024",
                "BalanceGeneral": {"Caja y Bancos": 600},
                "EstadoResultados": {"Ventas Netas": "6,500"}
            }
        ]
    });

    let response: ExtractionResponse = serde_json::from_value(raw)?;
    let reports = response.into_reports("empresa.pdf");
    assert_eq!(reports.len(), 2);

    let processed = process_statements(&reports)?;
    assert_eq!(processed.balance_sheet.columns().len(), 2);

    // 2023 is in thousands of COP: (120 + 380) * 1000 * 0.00023 = 115 USD.
    let cash_2023 = processed
        .balance_sheet
        .value("Efectivo y equivalentes de efectivo", 0)
        .unwrap();
    assert!((cash_2023 - 115.0).abs() < 1e-9);

    let payables_2023 = processed.balance_sheet.value("Cuentas por pagar", 0).unwrap();
    assert!((payables_2023 - (-450.0 * 1000.0 * 0.00023)).abs() < 1e-9);

    // 2024: 600 * 1000 * 0.00024 = 144 USD.
    let cash_2024 = processed
        .balance_sheet
        .value("Efectivo y equivalentes de efectivo", 1)
        .unwrap();
    assert!((cash_2024 - 144.0).abs() < 1e-9);

    let sales_2024 = processed
        .income_statement
        .value("Ingresos operacionales", 1)
        .unwrap();
    assert!((sales_2024 - 6500.0 * 1000.0 * 0.00024).abs() < 1e-9);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("estados.xlsx");
    processed.write_workbook(&path)?;
    assert!(path.exists());

    Ok(())
}

#[test]
fn test_synonyms_of_one_concept_accumulate_across_sections() {
    let report = extracted_report(
        "doc.pdf",
        2024,
        "USD",
        Magnitude::Units,
        json!({
            "Corriente": {"Maquinaria y Equipo": 700},
            "No Corriente": {"Edificios": 1300}
        }),
        json!({}),
    );

    let processed = process_statements(&[report]).unwrap();
    assert_eq!(
        processed.balance_sheet.value("Propiedad, planta y equipo", 0),
        Some(2000.0)
    );
}

#[test]
fn test_strict_rate_policy_aborts_processing() {
    let processor = StatementProcessor::new(
        Taxonomy::standard(),
        ExchangeRateTable::standard_with_policy(RatePolicy::Strict),
    );
    let report = extracted_report(
        "viejo.pdf",
        1999,
        "COP",
        Magnitude::Units,
        json!({"Caja": 100}),
        json!({}),
    );

    match processor.process(&[report]) {
        Err(StatementError::MissingRate { currency, year }) => {
            assert_eq!(currency, "COP");
            assert_eq!(year, 1999);
        }
        other => panic!("expected MissingRate, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_accounts_do_not_leak_into_tables() {
    let report = extracted_report(
        "doc.pdf",
        2024,
        "USD",
        Magnitude::Units,
        json!({"Cuenta Inventada": 9999, "Caja": 1}),
        json!({}),
    );

    let processed = process_statements(&[report]).unwrap();
    let total: f64 = processed
        .balance_sheet
        .rows()
        .iter()
        .map(|c| processed.balance_sheet.value(&c.name, 0).unwrap())
        .sum();
    assert_eq!(total, 1.0);
}

#[test]
fn test_table_renderings() {
    let report = extracted_report(
        "doc.pdf",
        2024,
        "USD",
        Magnitude::Units,
        json!({"Caja": 1234567.891}),
        json!({}),
    );

    let processed = process_statements(&[report]).unwrap();
    let markdown = processed.balance_sheet.to_markdown();
    assert!(markdown.contains("doc.pdf (2024)"));
    assert!(markdown.contains("1,234,567.89"));

    let csv = processed.balance_sheet.to_csv();
    assert!(csv.contains("Cuenta,doc.pdf (2024)"));
    assert!(csv.contains("Efectivo y equivalentes de efectivo,1234567.89"));
}
