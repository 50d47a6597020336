/// The fixed extraction prompt. It pins the exact JSON object shape the
/// rest of the pipeline parses; the model's output is still treated as a
/// soft contract and recovered defensively.
pub const EXTRACTION_PROMPT: &str = r#"
Eres un analista financiero. Recibirás un estado financiero en PDF
(balance general y estado de resultados, posiblemente para varios años).

## TU MISIÓN
Extrae todas las cuentas con sus valores numéricos, por año fiscal.

## REGLAS
1. Extrae ÚNICAMENTE cuentas de detalle (las líneas más granulares).
   NO extraigas subtotales ni totales calculados ("Total Activos",
   "Utilidad Bruta", "Total Pasivo y Patrimonio").
2. Usa los nombres de cuenta EXACTAMENTE como aparecen en el documento.
3. Copia los valores tal como están escritos. Los valores entre
   paréntesis son negativos.
4. Indica la moneda (código ISO 4217, por ejemplo COP, MXN, USD) y la
   unidad en que están expresadas las cifras (unidades, miles o millones).
5. Si el documento presenta varios años, devuelve una entrada por año.

## FORMATO DE SALIDA
Devuelve SOLAMENTE un objeto JSON válido con esta forma exacta:

{
  "Moneda": "<código ISO>",
  "Unidad": "<unidades|miles|millones>",
  "ReportesPorAnio": [
    {
      "Anio": "<año, por ejemplo 2024>",
      "BalanceGeneral": { "<cuenta>": <valor>, ... },
      "EstadoResultados": { "<cuenta>": <valor>, ... }
    }
  ]
}

Las cuentas pueden agruparse en objetos anidados por sección si el
documento lo hace. No incluyas texto fuera del objeto JSON.
"#;
