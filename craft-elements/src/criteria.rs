//! Criteria: the resolved description of one element query.
//!
//! A [`Criteria`] is produced by the resolver from a loosely-typed
//! [`CriteriaSpec`] and is not mutated afterwards; the `with_*` methods return
//! modified copies. Constraints are kept sorted by attribute so that equal
//! inputs always produce identical criteria and identical cache keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::{ElementsError, Result};

/// Comparison applied to one attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Comparison {
    Eq(Value),
    Ne(Value),
    Gt(Value),
    Gte(Value),
    Lt(Value),
    Lte(Value),
    Like(String),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    IsNull,
    NotNull,
}

impl Comparison {
    /// SQL operator for binary comparisons.
    pub(crate) fn sql_operator(&self) -> Option<&'static str> {
        match self {
            Comparison::Eq(_) => Some("="),
            Comparison::Ne(_) => Some("<>"),
            Comparison::Gt(_) => Some(">"),
            Comparison::Gte(_) => Some(">="),
            Comparison::Lt(_) => Some("<"),
            Comparison::Lte(_) => Some("<="),
            Comparison::Like(_) => Some("LIKE"),
            _ => None,
        }
    }
}

/// A named constraint: attribute plus comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub attribute: String,
    pub comparison: Comparison,
}

impl Constraint {
    pub fn new(attribute: impl Into<String>, comparison: Comparison) -> Self {
        Self {
            attribute: attribute.into(),
            comparison,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub attribute: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn new(attribute: impl Into<String>, direction: Direction) -> Self {
        Self {
            attribute: attribute.into(),
            direction,
        }
    }
}

/// Fully resolved query specification for one element kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Criteria {
    constraints: Vec<Constraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    related_to: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    order_by: Vec<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    offset: Option<u32>,
}

impl Criteria {
    /// Criteria with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Constraint on `attribute`, if any.
    pub fn constraint(&self, attribute: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.attribute == attribute)
    }

    pub fn related_to(&self) -> Option<&[u64]> {
        self.related_to.as_deref()
    }

    pub fn order_by(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn limit(&self) -> Option<u32> {
        self.limit
    }

    pub fn offset(&self) -> Option<u32> {
        self.offset
    }

    /// True when nothing narrows, orders or windows the query.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
            && self.related_to.is_none()
            && self.order_by.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
    }

    /// Add or replace the constraint on an attribute, keeping attribute order.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        match self
            .constraints
            .binary_search_by(|c| c.attribute.as_str().cmp(constraint.attribute.as_str()))
        {
            Ok(idx) => self.constraints[idx] = constraint,
            Err(idx) => self.constraints.insert(idx, constraint),
        }
        self
    }

    pub fn with_related_to(mut self, ids: Option<Vec<u64>>) -> Self {
        self.related_to = ids;
        self
    }

    pub fn with_order_by(mut self, order_by: Vec<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: Option<u32>) -> Self {
        self.offset = offset;
        self
    }

    /// Copy with limit and offset removed, for unbounded counts.
    pub fn without_window(&self) -> Self {
        self.clone().with_limit(None).with_offset(None)
    }

    /// Page size for pagination.
    pub fn require_page_size(&self) -> Result<u32> {
        match self.limit {
            Some(limit) if limit > 0 => Ok(limit),
            _ => Err(ElementsError::MissingPageSize),
        }
    }

    /// Canonical JSON form, stable for equal criteria.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Caller-supplied criteria before resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CriteriaSpec {
    /// No constraints.
    #[default]
    Empty,
    /// Attribute → operand pairs, plus the reserved keys
    /// `limit`, `offset`, `orderBy` and `relatedTo`.
    Params(Map<String, Value>),
    /// Already resolved; passed through untouched.
    Resolved(Criteria),
}

impl CriteriaSpec {
    /// Interpret a JSON value: `null` is empty, an object is params.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(CriteriaSpec::Empty),
            Value::Object(map) => Ok(CriteriaSpec::Params(map)),
            other => Err(ElementsError::invalid_operand(
                "criteria",
                format!("expected an object or null, got {other}"),
            )),
        }
    }
}

impl From<Criteria> for CriteriaSpec {
    fn from(criteria: Criteria) -> Self {
        CriteriaSpec::Resolved(criteria)
    }
}

impl From<Map<String, Value>> for CriteriaSpec {
    fn from(params: Map<String, Value>) -> Self {
        CriteriaSpec::Params(params)
    }
}

impl<T: Into<CriteriaSpec>> From<Option<T>> for CriteriaSpec {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl TryFrom<Value> for CriteriaSpec {
    type Error = ElementsError;

    fn try_from(value: Value) -> Result<Self> {
        CriteriaSpec::from_json(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_constraint_keeps_attributes_sorted_and_unique() {
        let criteria = Criteria::new()
            .with_constraint(Constraint::new("slug", Comparison::Eq(json!("a"))))
            .with_constraint(Constraint::new("authorId", Comparison::Eq(json!(1))))
            .with_constraint(Constraint::new("slug", Comparison::Eq(json!("b"))));

        let attrs: Vec<_> = criteria
            .constraints()
            .iter()
            .map(|c| c.attribute.as_str())
            .collect();
        assert_eq!(attrs, vec!["authorId", "slug"]);
        assert_eq!(
            criteria.constraint("slug").unwrap().comparison,
            Comparison::Eq(json!("b"))
        );
    }

    #[test]
    fn require_page_size() {
        assert!(matches!(
            Criteria::new().require_page_size(),
            Err(ElementsError::MissingPageSize)
        ));
        assert!(Criteria::new().with_limit(Some(0)).require_page_size().is_err());
        assert_eq!(Criteria::new().with_limit(Some(10)).require_page_size().unwrap(), 10);
    }

    #[test]
    fn without_window_drops_limit_and_offset() {
        let criteria = Criteria::new().with_limit(Some(5)).with_offset(Some(2));
        let unbounded = criteria.without_window();
        assert_eq!(unbounded.limit(), None);
        assert_eq!(unbounded.offset(), None);
        assert!(unbounded.is_empty());
    }

    #[test]
    fn spec_from_json() {
        assert_eq!(CriteriaSpec::from_json(Value::Null).unwrap(), CriteriaSpec::Empty);
        assert!(matches!(
            CriteriaSpec::from_json(json!({"section": "news"})).unwrap(),
            CriteriaSpec::Params(_)
        ));
        assert!(CriteriaSpec::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn spec_from_option() {
        let none: Option<Criteria> = None;
        assert_eq!(CriteriaSpec::from(none), CriteriaSpec::Empty);
        let some = Some(Criteria::new().with_limit(Some(3)));
        assert!(matches!(CriteriaSpec::from(some), CriteriaSpec::Resolved(_)));
    }

    #[test]
    fn cache_key_is_canonical_json() {
        let criteria = Criteria::new()
            .with_constraint(Constraint::new("section", Comparison::In(vec![json!("news")])))
            .with_limit(Some(10));
        assert_eq!(
            criteria.cache_key(),
            r#"{"constraints":[{"attribute":"section","comparison":{"op":"in","value":["news"]}}],"limit":10}"#
        );
    }

    #[test]
    fn pretty_log_shows_constraints() {
        let criteria = Criteria::new()
            .with_constraint(Constraint::new("section", Comparison::Eq(json!("news"))))
            .with_limit(Some(10));
        let rendered = craft_common::Pretty(&criteria).to_string();
        assert!(rendered.contains("attribute: section"));
        assert!(rendered.contains("op: eq"));
        assert!(rendered.contains("\n  limit: 10"));
    }
}
