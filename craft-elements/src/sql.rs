//! SQL rendering of resolved criteria.
//!
//! Produces parameterized statements (`$1`, `$2`, ...) for the storage
//! collaborator. Native attributes are read from the kind's table aliased as
//! `elements`; custom field handles from the joined `content` table's
//! `field_<handle>` columns. `relatedTo` renders as an `EXISTS` against the
//! `relations` table in either direction.

use serde_json::Value;

use crate::criteria::{Comparison, Constraint, Criteria};
use crate::kind::ElementKind;

/// A rendered statement and its bound parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Column expression for an attribute of `kind`.
pub fn column_for(kind: ElementKind, attribute: &str) -> String {
    if kind.is_native_attribute(attribute) {
        format!("{}.{}", quote_ident("elements"), quote_ident(attribute))
    } else {
        format!(
            "{}.{}",
            quote_ident("content"),
            quote_ident(&format!("field_{attribute}"))
        )
    }
}

struct SqlWriter {
    params: Vec<Value>,
}

impl SqlWriter {
    fn new() -> Self {
        Self { params: Vec::new() }
    }

    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("${}", self.params.len())
    }

    fn bind_list(&mut self, values: &[Value]) -> String {
        values
            .iter()
            .map(|v| self.bind(v.clone()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn constraint(&mut self, kind: ElementKind, constraint: &Constraint) -> String {
        let column = column_for(kind, &constraint.attribute);
        match &constraint.comparison {
            Comparison::IsNull => format!("{column} IS NULL"),
            Comparison::NotNull => format!("{column} IS NOT NULL"),
            Comparison::In(values) if values.is_empty() => "1 = 0".to_string(),
            Comparison::NotIn(values) if values.is_empty() => "1 = 1".to_string(),
            Comparison::In(values) => format!("{column} IN ({})", self.bind_list(values)),
            Comparison::NotIn(values) => format!("{column} NOT IN ({})", self.bind_list(values)),
            Comparison::Like(pattern) => {
                let placeholder = self.bind(Value::String(pattern.clone()));
                format!("{column} LIKE {placeholder}")
            }
            Comparison::Eq(v)
            | Comparison::Ne(v)
            | Comparison::Gt(v)
            | Comparison::Gte(v)
            | Comparison::Lt(v)
            | Comparison::Lte(v) => {
                let operator = constraint.comparison.sql_operator().unwrap_or("=");
                let placeholder = self.bind(v.clone());
                format!("{column} {operator} {placeholder}")
            }
        }
    }

    fn related_to(&mut self, ids: &[u64]) -> String {
        if ids.is_empty() {
            return "1 = 0".to_string();
        }
        let values: Vec<Value> = ids.iter().map(|id| Value::from(*id)).collect();
        let targets = self.bind_list(&values);
        let sources = self.bind_list(&values);
        let relations = quote_ident("relations");
        let id = format!("{}.{}", quote_ident("elements"), quote_ident("id"));
        format!(
            "EXISTS (SELECT 1 FROM {relations} WHERE ({relations}.\"sourceId\" = {id} AND {relations}.\"targetId\" IN ({targets})) OR ({relations}.\"targetId\" = {id} AND {relations}.\"sourceId\" IN ({sources})))"
        )
    }

    fn from_where(&mut self, kind: ElementKind, criteria: &Criteria) -> String {
        let mut sql = format!(
            " FROM {} AS {} LEFT JOIN {} ON {}.\"elementId\" = {}.\"id\"",
            quote_ident(kind.table()),
            quote_ident("elements"),
            quote_ident("content"),
            quote_ident("content"),
            quote_ident("elements"),
        );

        let mut conditions: Vec<String> = criteria
            .constraints()
            .iter()
            .map(|c| self.constraint(kind, c))
            .collect();
        if let Some(ids) = criteria.related_to() {
            conditions.push(self.related_to(ids));
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql
    }
}

impl Criteria {
    /// `SELECT` statement returning matching element rows.
    pub fn select_sql(&self, kind: ElementKind) -> SqlQuery {
        let mut writer = SqlWriter::new();
        let mut sql = format!(
            "SELECT {}.*, {}.*",
            quote_ident("elements"),
            quote_ident("content")
        );
        sql.push_str(&writer.from_where(kind, self));

        if !self.order_by().is_empty() {
            let terms: Vec<String> = self
                .order_by()
                .iter()
                .map(|o| format!("{} {}", column_for(kind, &o.attribute), o.direction.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }
        if let Some(limit) = self.limit() {
            let placeholder = writer.bind(Value::from(limit));
            sql.push_str(&format!(" LIMIT {placeholder}"));
        }
        if let Some(offset) = self.offset() {
            let placeholder = writer.bind(Value::from(offset));
            sql.push_str(&format!(" OFFSET {placeholder}"));
        }

        SqlQuery {
            sql,
            params: writer.params,
        }
    }

    /// `SELECT COUNT(*)` over the same filters, ignoring order and window.
    pub fn count_sql(&self, kind: ElementKind) -> SqlQuery {
        let mut writer = SqlWriter::new();
        let mut sql = String::from("SELECT COUNT(*)");
        sql.push_str(&writer.from_where(kind, self));
        SqlQuery {
            sql,
            params: writer.params,
        }
    }
}
