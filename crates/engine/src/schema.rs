//! Per-category record schemas.
//!
//! A [`Schema`] describes everything the ledger needs to know about one kind
//! of record: where it lives remotely, which fields a form shows, which field
//! feeds the running total, and how a row is displayed. The ledger never
//! branches on the category itself; it only ever asks the active schema.
use std::fmt;

use crate::{
    aggregate::{format_currency, parse_numeric},
    error::LedgerError,
    record::{FieldValue, Fields, Record},
};

/// Kind of input a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    /// One of a fixed list of options.
    Choice(&'static [&'static str]),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Column header and form placeholder.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Value pre-filled in a blank draft.
    pub default: Option<&'static str>,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            default: None,
        }
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Email,
            default: None,
        }
    }

    pub const fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
            default: None,
        }
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
        default: &'static str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Choice(options),
            default: Some(default),
        }
    }

    fn check(&self, value: Option<&FieldValue>) -> Result<(), LedgerError> {
        let value = match value {
            Some(value) if !value.is_blank() => value,
            _ => {
                return Err(LedgerError::Validation(format!(
                    "{} is required",
                    self.label
                )));
            }
        };

        match (self.kind, value) {
            (FieldKind::Number, FieldValue::Number(number)) if number.is_finite() => Ok(()),
            (FieldKind::Number, FieldValue::Text(text))
                if text.trim().parse::<f64>().is_ok_and(f64::is_finite) =>
            {
                Ok(())
            }
            (FieldKind::Number, _) => Err(LedgerError::Validation(format!(
                "{} must be a number",
                self.label
            ))),
            (FieldKind::Email, value) => {
                let text = value.to_string();
                match text.trim().split_once('@') {
                    Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
                    _ => Err(LedgerError::Validation(format!(
                        "{} must be an email address",
                        self.label
                    ))),
                }
            }
            (FieldKind::Choice(options), value) => {
                let text = value.to_string();
                if options.contains(&text.as_str()) {
                    Ok(())
                } else {
                    Err(LedgerError::Validation(format!(
                        "{} must be one of: {}",
                        self.label,
                        options.join(", ")
                    )))
                }
            }
            (FieldKind::Text, _) => Ok(()),
        }
    }
}

/// Strategy turning a record into display cells.
pub type RowRenderer = fn(&Schema, &Record) -> Vec<String>;

/// Default renderer: one cell per field, numbers as currency.
pub fn render_fields(schema: &Schema, record: &Record) -> Vec<String> {
    schema
        .fields
        .iter()
        .map(|spec| match spec.kind {
            FieldKind::Number => format_currency(parse_numeric(record.get(spec.name))),
            _ => record.text(spec.name),
        })
        .collect()
}

#[derive(Clone)]
pub struct Schema {
    pub key: &'static str,
    pub title: &'static str,
    /// Remote collection holding the records.
    pub collection: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Field summed for the running total; no total when `None`.
    pub total_field: Option<&'static str>,
    pub renderer: RowRenderer,
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("key", &self.key)
            .field("collection", &self.collection)
            .field("fields", &self.fields)
            .field("total_field", &self.total_field)
            .finish_non_exhaustive()
    }
}

impl Schema {
    pub fn new(key: &'static str, title: &'static str, collection: &'static str) -> Self {
        Self {
            key,
            title,
            collection,
            fields: Vec::new(),
            total_field: None,
            renderer: render_fields,
        }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn total(mut self, field: &'static str) -> Self {
        self.total_field = Some(field);
        self
    }

    pub fn renderer(mut self, renderer: RowRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|spec| spec.label).collect()
    }

    pub fn render_row(&self, record: &Record) -> Vec<String> {
        (self.renderer)(self, record)
    }

    /// Draft used when starting a new record: defaulted fields only.
    pub fn blank_draft(&self) -> Fields {
        self.fields
            .iter()
            .filter_map(|spec| {
                spec.default
                    .map(|default| (spec.name.to_string(), FieldValue::from(default)))
            })
            .collect()
    }

    /// Checks a draft the way the entry form does: every field present and
    /// well formed for its kind.
    pub fn validate(&self, draft: &Fields) -> Result<(), LedgerError> {
        self.fields
            .iter()
            .try_for_each(|spec| spec.check(draft.get(spec.name)))
    }
}

const ROLES: &[&str] = &["Admin", "Editor", "Viewer"];

pub fn team_members() -> Schema {
    Schema::new("team-members", "User Management", "users")
        .field(FieldSpec::text("name", "Name"))
        .field(FieldSpec::email("email", "Email"))
        .field(FieldSpec::choice("role", "Role", ROLES, "Viewer"))
}

pub fn bills() -> Schema {
    Schema::new("bills", "Bill Tracker", "bills")
        .field(FieldSpec::text("name", "Name of Bill"))
        .field(FieldSpec::text("description", "Description"))
        .field(FieldSpec::number("amount", "Amount"))
        .total("amount")
}

pub fn material_procurement() -> Schema {
    Schema::new(
        "material-procurement",
        "Material Procurement",
        "materialProcurement",
    )
    .field(FieldSpec::text("item", "Item Purchased"))
    .field(FieldSpec::text("department", "Department"))
    .field(FieldSpec::number("price", "Price"))
    .total("price")
}

pub fn employee_reimbursements() -> Schema {
    Schema::new(
        "employee-reimbursements",
        "Employee Reimbursements",
        "employeeReimbursements",
    )
    .field(FieldSpec::text("employee", "Name of Employee"))
    .field(FieldSpec::number("amount", "Amount"))
    .field(FieldSpec::text("status", "Status"))
    .total("amount")
}

/// Static lookup from category key to [`Schema`].
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    schemas: Vec<Schema>,
}

impl SchemaRegistry {
    /// The four categories of the business ledger.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        registry.register(team_members());
        registry.register(bills());
        registry.register(material_procurement());
        registry.register(employee_reimbursements());
        registry
    }

    /// Adds a schema, replacing any schema already using its key.
    pub fn register(&mut self, schema: Schema) {
        match self.position(schema.key) {
            Some(index) => self.schemas[index] = schema,
            None => self.schemas.push(schema),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Schema> {
        self.schemas.iter().find(|schema| schema.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.iter().map(|schema| schema.key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.schemas.iter().position(|schema| schema.key == key)
    }

    pub(crate) fn at(&self, index: usize) -> &Schema {
        &self.schemas[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DocumentId, fields};

    #[test]
    fn builtin_registry_covers_every_page() {
        let registry = SchemaRegistry::builtin();
        let keys: Vec<_> = registry.keys().collect();
        assert_eq!(
            keys,
            vec![
                "team-members",
                "bills",
                "material-procurement",
                "employee-reimbursements"
            ]
        );
        assert_eq!(registry.get("bills").unwrap().collection, "bills");
        assert!(registry.get("team-members").unwrap().total_field.is_none());
        assert!(registry.get("payroll").is_none());
    }

    #[test]
    fn register_replaces_existing_key() {
        let mut registry = SchemaRegistry::builtin();
        registry.register(Schema::new("bills", "Bills v2", "bills_v2"));
        assert_eq!(registry.get("bills").unwrap().collection, "bills_v2");
        assert_eq!(registry.keys().count(), 4);
    }

    #[test]
    fn blank_draft_holds_only_defaults() {
        let draft = team_members().blank_draft();
        assert_eq!(draft, fields([("role", "Viewer")]));
        assert!(bills().blank_draft().is_empty());
    }

    #[test]
    fn render_row_formats_number_columns_as_currency() {
        let schema = employee_reimbursements();
        let record = Record::new(
            DocumentId::new("r1").unwrap(),
            fields([("employee", "Ana"), ("amount", "12.5"), ("status", "Paid")]),
        );
        assert_eq!(schema.columns(), vec!["Name of Employee", "Amount", "Status"]);
        assert_eq!(schema.render_row(&record), vec!["Ana", "$12.50", "Paid"]);
    }

    #[test]
    fn render_row_tolerates_garbage_amounts() {
        let schema = bills();
        let record = Record {
            id: None,
            fields: fields([("name", "Rent"), ("amount", "n/a")]),
        };
        assert_eq!(schema.render_row(&record), vec!["Rent", "", "$0.00"]);
    }

    #[test]
    fn custom_renderer_is_used() {
        fn upper(_: &Schema, record: &Record) -> Vec<String> {
            vec![record.text("name").to_uppercase()]
        }
        let schema = Schema::new("x", "X", "x")
            .field(FieldSpec::text("name", "Name"))
            .renderer(upper);
        let record = Record {
            id: None,
            fields: fields([("name", "rent")]),
        };
        assert_eq!(schema.render_row(&record), vec!["RENT"]);
    }

    #[test]
    fn validate_requires_every_field() {
        let err = bills()
            .validate(&fields([("name", "Rent"), ("amount", "100")]))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Validation("Description is required".to_string())
        );
    }

    #[test]
    fn validate_checks_kinds() {
        let schema = team_members();
        assert!(
            schema
                .validate(&fields([
                    ("name", "Ana"),
                    ("email", "ana@example.com"),
                    ("role", "Editor")
                ]))
                .is_ok()
        );
        assert!(
            schema
                .validate(&fields([
                    ("name", "Ana"),
                    ("email", "ana"),
                    ("role", "Editor")
                ]))
                .is_err()
        );
        assert!(
            schema
                .validate(&fields([
                    ("name", "Ana"),
                    ("email", "ana@example.com"),
                    ("role", "Owner")
                ]))
                .is_err()
        );

        let bills = bills();
        let draft = fields([("name", "Rent"), ("description", "May"), ("amount", "12x")]);
        assert_eq!(
            bills.validate(&draft).unwrap_err(),
            LedgerError::Validation("Amount must be a number".to_string())
        );
        let mut draft = draft;
        draft.insert("amount".to_string(), FieldValue::Number(12.0));
        assert!(bills.validate(&draft).is_ok());
    }
}
