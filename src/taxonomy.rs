use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Section {
    Assets,
    Liabilities,
    Equity,
    Revenue,
    Costs,
    Expenses,
    Other,
}

impl Section {
    pub fn statement_kind(&self) -> StatementKind {
        match self {
            Section::Assets | Section::Liabilities | Section::Equity => {
                StatementKind::BalanceSheet
            }
            Section::Revenue | Section::Costs | Section::Expenses | Section::Other => {
                StatementKind::IncomeStatement
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Assets => "Activos",
            Section::Liabilities => "Pasivos",
            Section::Equity => "Patrimonio",
            Section::Revenue => "Ingresos",
            Section::Costs => "Costos",
            Section::Expenses => "Gastos",
            Section::Other => "Otros",
        }
    }
}

/// A canonical financial statement line item. The order of concepts within
/// a [`Taxonomy`] is the display order of the final tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub name: String,
    pub section: Section,
}

/// Immutable mapping of raw account labels onto canonical concepts.
///
/// Built once (via [`TaxonomyBuilder`] or [`Taxonomy::standard`]) and passed
/// explicitly to the aggregation functions; there is no shared global table.
/// Lookups are case-insensitive and whitespace-trimmed, and every canonical
/// name resolves to itself.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    balance_sheet: Vec<Concept>,
    income_statement: Vec<Concept>,
    balance_synonyms: HashMap<String, String>,
    income_synonyms: HashMap<String, String>,
}

impl Taxonomy {
    pub fn builder() -> TaxonomyBuilder {
        TaxonomyBuilder::default()
    }

    /// Canonical concepts of one statement, in display order.
    pub fn concepts(&self, kind: StatementKind) -> &[Concept] {
        match kind {
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::IncomeStatement => &self.income_statement,
        }
    }

    /// Resolve a raw account label to its canonical concept name.
    pub fn resolve(&self, kind: StatementKind, raw_label: &str) -> Option<&str> {
        let key = normalize_label(raw_label);
        let map = match kind {
            StatementKind::BalanceSheet => &self.balance_synonyms,
            StatementKind::IncomeStatement => &self.income_synonyms,
        };
        map.get(&key).map(String::as_str)
    }

    pub fn contains(&self, kind: StatementKind, canonical_name: &str) -> bool {
        self.concepts(kind).iter().any(|c| c.name == canonical_name)
    }

    /// The built-in taxonomy for Spanish-language financial statements.
    pub fn standard() -> Self {
        let mut builder = Self::builder();

        builder
            .concept(
                Section::Assets,
                "Efectivo y equivalentes de efectivo",
                &[
                    "caja",
                    "bancos",
                    "caja y bancos",
                    "efectivo",
                    "disponible",
                    "efectivo y bancos",
                    "equivalentes de efectivo",
                    "inversiones temporales",
                ],
            )
            .concept(
                Section::Assets,
                "Cuentas por cobrar",
                &[
                    "clientes",
                    "deudores",
                    "cartera",
                    "cuentas por cobrar comerciales",
                    "deudores comerciales",
                    "cuentas por cobrar clientes",
                    "documentos por cobrar",
                ],
            )
            .concept(
                Section::Assets,
                "Inventarios",
                &[
                    "inventario",
                    "existencias",
                    "mercancias",
                    "mercancías",
                    "inventario de mercancias",
                    "inventarios de producto terminado",
                ],
            )
            .concept(
                Section::Assets,
                "Propiedad, planta y equipo",
                &[
                    "activos fijos",
                    "propiedades planta y equipo",
                    "propiedad planta y equipo",
                    "maquinaria y equipo",
                    "equipo de oficina",
                    "equipo de computo",
                    "edificios",
                    "terrenos",
                    "flota y equipo de transporte",
                ],
            )
            .concept(
                Section::Assets,
                "Otros activos",
                &[
                    "activos diferidos",
                    "intangibles",
                    "activos intangibles",
                    "inversiones permanentes",
                    "gastos pagados por anticipado",
                    "otros activos corrientes",
                    "otros activos no corrientes",
                ],
            )
            .concept(
                Section::Liabilities,
                "Cuentas por pagar",
                &[
                    "proveedores",
                    "acreedores",
                    "cuentas por pagar comerciales",
                    "acreedores comerciales",
                    "cuentas por pagar proveedores",
                ],
            )
            .concept(
                Section::Liabilities,
                "Obligaciones financieras",
                &[
                    "prestamos bancarios",
                    "préstamos bancarios",
                    "deuda financiera",
                    "obligaciones bancarias",
                    "creditos bancarios",
                    "pasivos financieros",
                ],
            )
            .concept(
                Section::Liabilities,
                "Impuestos por pagar",
                &[
                    "impuestos gravamenes y tasas",
                    "impuesto de renta por pagar",
                    "retenciones por pagar",
                    "iva por pagar",
                ],
            )
            .concept(
                Section::Liabilities,
                "Otros pasivos",
                &[
                    "pasivos estimados",
                    "provisiones",
                    "beneficios a empleados",
                    "obligaciones laborales",
                    "otros pasivos corrientes",
                    "ingresos recibidos por anticipado",
                ],
            )
            .concept(
                Section::Equity,
                "Capital social",
                &[
                    "capital",
                    "capital suscrito y pagado",
                    "aportes sociales",
                    "capital pagado",
                ],
            )
            .concept(
                Section::Equity,
                "Utilidades retenidas",
                &[
                    "utilidades acumuladas",
                    "resultados de ejercicios anteriores",
                    "ganancias acumuladas",
                    "utilidades de ejercicios anteriores",
                ],
            )
            .concept(
                Section::Equity,
                "Resultado del ejercicio",
                &[
                    "utilidad del ejercicio",
                    "utilidad neta del ejercicio",
                    "perdida del ejercicio",
                    "pérdida del ejercicio",
                    "resultado neto del ejercicio",
                ],
            )
            .concept(
                Section::Equity,
                "Otras reservas",
                &[
                    "reservas",
                    "reserva legal",
                    "superavit de capital",
                    "revalorizacion del patrimonio",
                ],
            );

        builder
            .concept(
                Section::Revenue,
                "Ingresos operacionales",
                &[
                    "ventas",
                    "ingresos por ventas",
                    "ventas netas",
                    "ingresos de actividades ordinarias",
                    "ingresos operativos",
                    "ingresos ordinarios",
                ],
            )
            .concept(
                Section::Costs,
                "Costo de ventas",
                &[
                    "costo de mercancia vendida",
                    "costo de mercancía vendida",
                    "costos de venta",
                    "costo de produccion",
                    "costos de produccion y venta",
                ],
            )
            .concept(
                Section::Expenses,
                "Gastos de administración",
                &[
                    "gastos administrativos",
                    "gastos de administracion",
                    "gastos de personal",
                    "gastos generales",
                    "gastos operacionales de administracion",
                ],
            )
            .concept(
                Section::Expenses,
                "Gastos de ventas",
                &[
                    "gastos de comercializacion",
                    "gastos de distribucion",
                    "gastos operacionales de ventas",
                ],
            )
            .concept(
                Section::Expenses,
                "Gastos financieros",
                &[
                    "costos financieros",
                    "intereses",
                    "gastos por intereses",
                    "gastos bancarios",
                ],
            )
            .concept(
                Section::Other,
                "Otros ingresos",
                &[
                    "ingresos no operacionales",
                    "otros ingresos no operativos",
                    "ingresos financieros",
                    "ingresos por intereses",
                ],
            )
            .concept(
                Section::Other,
                "Otros gastos",
                &["gastos no operacionales", "otros egresos"],
            )
            .concept(
                Section::Other,
                "Impuesto de renta",
                &[
                    "impuesto sobre la renta",
                    "provision impuesto de renta",
                    "impuesto a las ganancias",
                    "impuesto de renta y complementarios",
                ],
            );

        builder.build()
    }
}

/// Builds a [`Taxonomy`]. Synonym bindings are first-write-wins: registering
/// a raw label that is already bound to a different concept keeps the
/// original binding and logs a warning.
#[derive(Debug, Default)]
pub struct TaxonomyBuilder {
    balance_sheet: Vec<Concept>,
    income_statement: Vec<Concept>,
    balance_synonyms: HashMap<String, String>,
    income_synonyms: HashMap<String, String>,
}

impl TaxonomyBuilder {
    pub fn concept(&mut self, section: Section, name: &str, synonyms: &[&str]) -> &mut Self {
        let kind = section.statement_kind();
        {
            let concepts = match kind {
                StatementKind::BalanceSheet => &mut self.balance_sheet,
                StatementKind::IncomeStatement => &mut self.income_statement,
            };
            if concepts.iter().any(|c| c.name == name) {
                warn!("Duplicate canonical concept '{}' ignored", name);
                return self;
            }
            concepts.push(Concept {
                name: name.to_string(),
                section,
            });
        }

        self.bind(kind, name, name);
        for synonym in synonyms {
            self.bind(kind, synonym, name);
        }
        self
    }

    fn bind(&mut self, kind: StatementKind, raw_label: &str, canonical: &str) {
        let map = match kind {
            StatementKind::BalanceSheet => &mut self.balance_synonyms,
            StatementKind::IncomeStatement => &mut self.income_synonyms,
        };
        let key = normalize_label(raw_label);
        match map.get(&key) {
            Some(existing) if existing != canonical => {
                warn!(
                    "Synonym '{}' already bound to '{}'; binding to '{}' ignored",
                    raw_label, existing, canonical
                );
            }
            Some(_) => {}
            None => {
                map.insert(key, canonical.to_string());
            }
        }
    }

    pub fn build(self) -> Taxonomy {
        Taxonomy {
            balance_sheet: self.balance_sheet,
            income_statement: self.income_statement,
            balance_synonyms: self.balance_synonyms,
            income_synonyms: self.income_synonyms,
        }
    }
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}
