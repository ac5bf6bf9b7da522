//! Plain-text rendering of ledger state.
use std::fmt::Write;

use engine::{
    DocumentStore, FieldKind, FieldValue, Fields, Ledger, Schema, SchemaRegistry, format_currency,
};

use crate::error::{AppError, Result};

/// Converts raw input for `name` to the value a form would store: numbers
/// for numeric fields when the text parses, text otherwise.
pub fn input_value(schema: &Schema, name: &str, raw: &str) -> Result<FieldValue> {
    let spec = schema.field_spec(name).ok_or_else(|| {
        AppError::Usage(format!(
            "unknown field `{name}` for {}; expected one of: {}",
            schema.key,
            field_names(schema)
        ))
    })?;

    Ok(match spec.kind {
        FieldKind::Number => match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => FieldValue::Number(number),
            _ => FieldValue::from(raw),
        },
        _ => FieldValue::from(raw),
    })
}

pub fn field_names(schema: &Schema) -> String {
    schema
        .fields
        .iter()
        .map(|spec| spec.name)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn categories(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for schema in registry.iter() {
        let _ = writeln!(
            out,
            "{:<24} {:<26} {}",
            schema.key, schema.title, schema.collection
        );
    }
    out
}

/// Table of the cached records: header, one line per row, then the total.
pub fn table<S: DocumentStore>(ledger: &Ledger<S>) -> String {
    let schema = ledger.schema();
    let mut header = vec!["#".to_string()];
    header.extend(schema.columns().into_iter().map(str::to_string));

    let editing = ledger.session().editing_index();
    let rows: Vec<Vec<String>> = ledger
        .rows()
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            let marker = if editing == Some(index) { "*" } else { "" };
            let mut row = vec![format!("{index}{marker}")];
            row.extend(cells);
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!("{}\n", schema.title);
    push_line(&mut out, &header, &widths);
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    if rows.is_empty() {
        out.push_str("(no records)\n");
    }
    if let Some(total) = ledger.total() {
        let _ = writeln!(out, "Total: {}", format_currency(total));
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

pub fn total<S: DocumentStore>(ledger: &Ledger<S>) -> String {
    match ledger.total() {
        Some(total) => format!("{}: {}", ledger.schema().title, format_currency(total)),
        None => format!("{}: no total", ledger.schema().title),
    }
}

/// Current draft, one `field = value` line per schema field.
pub fn draft<S: DocumentStore>(ledger: &Ledger<S>) -> String {
    let Some(draft) = ledger.session().draft() else {
        return "no draft open\n".to_string();
    };
    let heading = match ledger.session().editing_index() {
        Some(index) => format!("editing record {index}"),
        None => "new record".to_string(),
    };
    let mut out = format!("{heading}\n");
    draft_lines(&mut out, ledger.schema(), draft);
    out
}

fn draft_lines(out: &mut String, schema: &Schema, draft: &Fields) {
    for spec in &schema.fields {
        let value = draft.get(spec.name).map(ToString::to_string).unwrap_or_default();
        let _ = writeln!(out, "  {:<12} = {}", spec.name, value);
    }
}

#[cfg(test)]
mod tests {
    use engine::{Document, MemoryStore, fields};

    use super::*;

    async fn bills_ledger() -> Ledger<MemoryStore> {
        let store = MemoryStore::new();
        store
            .seed(
                "bills",
                vec![Document {
                    id: "a".to_string(),
                    fields: fields([
                        ("name", FieldValue::from("Rent")),
                        ("description", FieldValue::from("May")),
                        ("amount", FieldValue::from(1200.0)),
                    ]),
                }],
            )
            .await;
        let mut ledger = Ledger::builder(store).category("bills").build().unwrap();
        ledger.load().await.unwrap();
        ledger
    }

    #[test]
    fn numeric_input_becomes_number() {
        let schema = engine::schema::bills();
        assert_eq!(
            input_value(&schema, "amount", " 12.5 ").unwrap(),
            FieldValue::Number(12.5)
        );
        assert_eq!(
            input_value(&schema, "amount", "12abc").unwrap(),
            FieldValue::from("12abc")
        );
        assert_eq!(
            input_value(&schema, "name", "42").unwrap(),
            FieldValue::from("42")
        );
        assert!(matches!(
            input_value(&schema, "colour", "red"),
            Err(AppError::Usage(_))
        ));
    }

    #[tokio::test]
    async fn table_lists_rows_and_total() {
        let ledger = bills_ledger().await;
        let out = table(&ledger);
        assert!(out.starts_with("Bill Tracker\n"));
        assert!(out.contains("Name of Bill"));
        assert!(out.contains("Rent"));
        assert!(out.contains("$1200.00"));
        assert!(out.ends_with("Total: $1200.00\n"));
    }

    #[tokio::test]
    async fn table_marks_row_under_edit() {
        let mut ledger = bills_ledger().await;
        ledger.begin_edit(0).unwrap();
        assert!(table(&ledger).lines().nth(2).unwrap().starts_with("0*"));
        assert!(draft(&ledger).starts_with("editing record 0\n"));
    }

    #[tokio::test]
    async fn draft_without_session() {
        let ledger = bills_ledger().await;
        assert_eq!(draft(&ledger), "no draft open\n");
    }
}
