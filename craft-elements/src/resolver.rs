//! Criteria resolution.
//!
//! Turns a [`CriteriaSpec`] into a [`Criteria`] for one element kind. Every
//! key is checked against the kind's queryable attributes (native attributes
//! plus any custom field handles registered for the kind), and each operand
//! is normalized into a [`Comparison`]:
//!
//! | operand | comparison |
//! |---|---|
//! | string, number, bool | `Eq` |
//! | `null` | `IsNull` |
//! | array of scalars | `In` |
//! | `{"not": x}` / `{"!=": x}` | `Ne`, or `NotNull` / `NotIn` for null / arrays |
//! | `{">": x}`, `{">=": x}`, `{"<": x}`, `{"<=": x}` | ordering comparison |
//! | `{"like": "foo%"}` | `Like` |
//! | `{"in": [...]}`, `{"not in": [...]}` | `In` / `NotIn` |
//!
//! Strings are always taken literally. Any other object shape is rejected.

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use crate::criteria::{Comparison, Constraint, Criteria, CriteriaSpec, Direction, OrderBy};
use crate::error::{ElementsError, Result};
use crate::kind::ElementKind;

/// Resolves raw criteria against element kinds.
#[derive(Debug, Clone, Default)]
pub struct CriteriaResolver {
    custom_attributes: HashMap<ElementKind, BTreeSet<String>>,
}

impl CriteriaResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow querying `kind` by additional custom field handles.
    pub fn with_custom_attributes<I, S>(mut self, kind: ElementKind, handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for handle in handles {
            self.register_custom_attribute(kind, handle);
        }
        self
    }

    pub fn register_custom_attribute(&mut self, kind: ElementKind, handle: impl Into<String>) {
        let handle = handle.into();
        trace!(%kind, %handle, "registered custom criteria attribute");
        self.custom_attributes.entry(kind).or_default().insert(handle);
    }

    /// Whether `attribute` may appear in criteria for `kind`.
    pub fn is_queryable(&self, kind: ElementKind, attribute: &str) -> bool {
        kind.is_native_attribute(attribute)
            || self
                .custom_attributes
                .get(&kind)
                .is_some_and(|handles| handles.contains(attribute))
    }

    /// Resolve a raw specification for `kind`.
    pub fn resolve(&self, spec: impl Into<CriteriaSpec>, kind: ElementKind) -> Result<Criteria> {
        match spec.into() {
            CriteriaSpec::Empty => Ok(Criteria::new()),
            CriteriaSpec::Resolved(criteria) => Ok(criteria),
            CriteriaSpec::Params(params) => self.resolve_params(&params, kind),
        }
    }

    fn resolve_params(&self, params: &Map<String, Value>, kind: ElementKind) -> Result<Criteria> {
        let mut criteria = Criteria::new();
        for (key, operand) in params {
            criteria = match key.as_str() {
                "limit" => criteria.with_limit(parse_window_value(key, operand)?),
                "offset" => criteria.with_offset(parse_window_value(key, operand)?),
                "orderBy" => criteria.with_order_by(self.parse_order_by(kind, operand)?),
                "relatedTo" => criteria.with_related_to(parse_related_to(operand)?),
                _ => criteria.with_constraint(self.resolve_constraint(kind, key, operand)?),
            };
        }
        debug!(%kind, key = %criteria.cache_key(), "resolved criteria");
        Ok(criteria)
    }

    /// Validate one attribute and normalize its operand.
    pub fn resolve_constraint(
        &self,
        kind: ElementKind,
        attribute: &str,
        operand: &Value,
    ) -> Result<Constraint> {
        if !self.is_queryable(kind, attribute) {
            return Err(ElementsError::unknown_attribute(attribute, kind));
        }
        Ok(Constraint::new(attribute, normalize_operand(attribute, operand)?))
    }

    /// Parse `"title asc, postDate desc"` or an array of such terms.
    pub fn parse_order_by(&self, kind: ElementKind, operand: &Value) -> Result<Vec<OrderBy>> {
        let terms: Vec<&str> = match operand {
            Value::Null => return Ok(Vec::new()),
            Value::String(s) => s.split(',').collect(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().ok_or_else(|| {
                        ElementsError::invalid_operand("orderBy", "terms must be strings")
                    })
                })
                .collect::<Result<_>>()?,
            _ => {
                return Err(ElementsError::invalid_operand(
                    "orderBy",
                    "expected a string or an array of strings",
                ))
            }
        };

        let mut order = Vec::new();
        for term in terms {
            let mut parts = term.split_whitespace();
            let Some(attribute) = parts.next() else {
                continue;
            };
            let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
                None | Some("asc") => Direction::Asc,
                Some("desc") => Direction::Desc,
                Some(other) => {
                    return Err(ElementsError::invalid_operand(
                        "orderBy",
                        format!("unknown direction '{other}'"),
                    ))
                }
            };
            if parts.next().is_some() {
                return Err(ElementsError::invalid_operand(
                    "orderBy",
                    format!("malformed term '{}'", term.trim()),
                ));
            }
            if !self.is_queryable(kind, attribute) {
                return Err(ElementsError::unknown_attribute(attribute, kind));
            }
            order.push(OrderBy::new(attribute, direction));
        }
        Ok(order)
    }
}

/// Resolve with the default resolver (native attributes only).
pub fn resolve(spec: impl Into<CriteriaSpec>, kind: ElementKind) -> Result<Criteria> {
    CriteriaResolver::default().resolve(spec, kind)
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}

fn scalar_list(attribute: &str, items: &[Value]) -> Result<Vec<Value>> {
    if let Some(bad) = items.iter().find(|item| !is_scalar(item)) {
        return Err(ElementsError::invalid_operand(
            attribute,
            format!("list members must be scalars, got {bad}"),
        ));
    }
    Ok(items.to_vec())
}

fn ordering_operand(attribute: &str, op: &str, value: &Value) -> Result<Value> {
    match value {
        Value::String(_) | Value::Number(_) => Ok(value.clone()),
        other => Err(ElementsError::invalid_operand(
            attribute,
            format!("'{op}' needs a string or number, got {other}"),
        )),
    }
}

fn normalize_operand(attribute: &str, operand: &Value) -> Result<Comparison> {
    match operand {
        Value::Null => Ok(Comparison::IsNull),
        Value::String(_) | Value::Number(_) | Value::Bool(_) => Ok(Comparison::Eq(operand.clone())),
        Value::Array(items) => Ok(Comparison::In(scalar_list(attribute, items)?)),
        Value::Object(map) => normalize_operator(attribute, map),
    }
}

fn normalize_operator(attribute: &str, map: &Map<String, Value>) -> Result<Comparison> {
    let mut entries = map.iter();
    let (Some((op, value)), None) = (entries.next(), entries.next()) else {
        return Err(ElementsError::invalid_operand(
            attribute,
            "operator objects must have exactly one key",
        ));
    };

    match (op.to_ascii_lowercase().as_str(), value) {
        ("=", Value::Null) => Ok(Comparison::IsNull),
        ("=", v) if is_scalar(v) => Ok(Comparison::Eq(v.clone())),
        ("not" | "!=", Value::Null) => Ok(Comparison::NotNull),
        ("not" | "!=", Value::Array(items)) => {
            Ok(Comparison::NotIn(scalar_list(attribute, items)?))
        }
        ("not" | "!=", v) if is_scalar(v) => Ok(Comparison::Ne(v.clone())),
        (">", v) => Ok(Comparison::Gt(ordering_operand(attribute, op, v)?)),
        (">=", v) => Ok(Comparison::Gte(ordering_operand(attribute, op, v)?)),
        ("<", v) => Ok(Comparison::Lt(ordering_operand(attribute, op, v)?)),
        ("<=", v) => Ok(Comparison::Lte(ordering_operand(attribute, op, v)?)),
        ("like", Value::String(pattern)) => Ok(Comparison::Like(pattern.clone())),
        ("in", Value::Array(items)) => Ok(Comparison::In(scalar_list(attribute, items)?)),
        ("not in", Value::Array(items)) => Ok(Comparison::NotIn(scalar_list(attribute, items)?)),
        (op, value) => Err(ElementsError::invalid_operand(
            attribute,
            format!("unsupported operator '{op}' with operand {value}"),
        )),
    }
}

fn parse_window_value(key: &str, operand: &Value) -> Result<Option<u32>> {
    match operand {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| {
                ElementsError::invalid_operand(key, format!("expected a non-negative integer, got {n}"))
            }),
        other => Err(ElementsError::invalid_operand(
            key,
            format!("expected a non-negative integer, got {other}"),
        )),
    }
}

fn parse_related_to(operand: &Value) -> Result<Option<Vec<u64>>> {
    let as_id = |value: &Value| {
        value.as_u64().ok_or_else(|| {
            ElementsError::invalid_operand("relatedTo", format!("expected an element id, got {value}"))
        })
    };
    match operand {
        Value::Null => Ok(None),
        Value::Array(items) => Ok(Some(items.iter().map(as_id).collect::<Result<_>>()?)),
        single => Ok(Some(vec![as_id(single)?])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> CriteriaSpec {
        CriteriaSpec::from_json(value).unwrap()
    }

    #[test]
    fn empty_spec_gives_empty_criteria() {
        let criteria = resolve(CriteriaSpec::Empty, ElementKind::Entry).unwrap();
        assert!(criteria.is_empty());
    }

    #[test]
    fn resolved_spec_passes_through() {
        let original = Criteria::new().with_limit(Some(4));
        let criteria = resolve(original.clone(), ElementKind::Tag).unwrap();
        assert_eq!(criteria, original);
    }

    #[test]
    fn unknown_attribute_fails_for_every_kind() {
        for kind in ElementKind::ALL {
            let err = resolve(params(json!({"bogusAttr": 1})), kind).unwrap_err();
            assert!(
                matches!(err, ElementsError::UnknownCriteriaAttribute { ref attribute, .. } if attribute == "bogusAttr"),
                "{kind}: {err}"
            );
        }
    }

    #[test]
    fn kind_specific_attributes_are_not_shared() {
        assert!(resolve(params(json!({"filename": "a.jpg"})), ElementKind::Asset).is_ok());
        assert!(resolve(params(json!({"filename": "a.jpg"})), ElementKind::Entry).is_err());
    }

    #[test]
    fn scalar_becomes_equality_and_array_membership() {
        let criteria = resolve(
            params(json!({"section": "news", "authorId": [1, 2]})),
            ElementKind::Entry,
        )
        .unwrap();
        assert_eq!(
            criteria.constraint("section").unwrap().comparison,
            Comparison::Eq(json!("news"))
        );
        assert_eq!(
            criteria.constraint("authorId").unwrap().comparison,
            Comparison::In(vec![json!(1), json!(2)])
        );
    }

    #[test]
    fn null_operand_is_null_check() {
        let criteria = resolve(params(json!({"expiryDate": null})), ElementKind::Entry).unwrap();
        assert_eq!(
            criteria.constraint("expiryDate").unwrap().comparison,
            Comparison::IsNull
        );
    }

    #[test]
    fn operator_objects() {
        let cases = [
            (json!({"not": "draft"}), Comparison::Ne(json!("draft"))),
            (json!({"!=": null}), Comparison::NotNull),
            (json!({"not": ["a", "b"]}), Comparison::NotIn(vec![json!("a"), json!("b")])),
            (json!({">=": 10}), Comparison::Gte(json!(10))),
            (json!({"<": "2015-01-01"}), Comparison::Lt(json!("2015-01-01"))),
            (json!({"like": "hello%"}), Comparison::Like("hello%".into())),
            (json!({"in": [3]}), Comparison::In(vec![json!(3)])),
            (json!({"not in": [3]}), Comparison::NotIn(vec![json!(3)])),
            (json!({"=": 5}), Comparison::Eq(json!(5))),
        ];
        for (operand, expected) in cases {
            let criteria = resolve(params(json!({ "title": operand })), ElementKind::Entry).unwrap();
            assert_eq!(criteria.constraint("title").unwrap().comparison, expected);
        }
    }

    #[test]
    fn ambiguous_objects_are_rejected() {
        for operand in [
            json!({}),
            json!({">": 1, "<": 5}),
            json!({"between": [1, 2]}),
            json!({">": [1, 2]}),
            json!({"like": 5}),
        ] {
            let err = resolve(params(json!({ "title": operand })), ElementKind::Entry).unwrap_err();
            assert!(matches!(err, ElementsError::InvalidCriteriaOperand { .. }));
        }
    }

    #[test]
    fn nested_lists_are_rejected() {
        let err = resolve(params(json!({"id": [[1]]})), ElementKind::Entry).unwrap_err();
        assert!(matches!(err, ElementsError::InvalidCriteriaOperand { .. }));
    }

    #[test]
    fn reserved_keys() {
        let criteria = resolve(
            params(json!({
                "limit": 10,
                "offset": 20,
                "orderBy": "postDate desc, title",
                "relatedTo": [4, 5],
            })),
            ElementKind::Entry,
        )
        .unwrap();
        assert_eq!(criteria.limit(), Some(10));
        assert_eq!(criteria.offset(), Some(20));
        assert_eq!(
            criteria.order_by(),
            &[
                OrderBy::new("postDate", Direction::Desc),
                OrderBy::new("title", Direction::Asc)
            ]
        );
        assert_eq!(criteria.related_to(), Some(&[4u64, 5][..]));
        assert!(criteria.constraints().is_empty());
    }

    #[test]
    fn invalid_window_values() {
        assert!(resolve(params(json!({"limit": -1})), ElementKind::Entry).is_err());
        assert!(resolve(params(json!({"limit": "10"})), ElementKind::Entry).is_err());
        assert!(resolve(params(json!({"offset": 1.5})), ElementKind::Entry).is_err());
        let criteria = resolve(params(json!({"limit": null})), ElementKind::Entry).unwrap();
        assert_eq!(criteria.limit(), None);
    }

    #[test]
    fn order_by_validates_attributes_and_directions() {
        assert!(matches!(
            resolve(params(json!({"orderBy": "nope asc"})), ElementKind::Entry),
            Err(ElementsError::UnknownCriteriaAttribute { .. })
        ));
        assert!(matches!(
            resolve(params(json!({"orderBy": "title sideways"})), ElementKind::Entry),
            Err(ElementsError::InvalidCriteriaOperand { .. })
        ));
        let criteria = resolve(
            params(json!({"orderBy": ["title DESC", "id"]})),
            ElementKind::Tag,
        )
        .unwrap();
        assert_eq!(criteria.order_by()[0], OrderBy::new("title", Direction::Desc));
    }

    #[test]
    fn related_to_single_id() {
        let criteria = resolve(params(json!({"relatedTo": 9})), ElementKind::Category).unwrap();
        assert_eq!(criteria.related_to(), Some(&[9u64][..]));
        assert!(resolve(params(json!({"relatedTo": "nine"})), ElementKind::Category).is_err());
    }

    #[test]
    fn custom_field_handles_are_queryable_when_registered() {
        let resolver =
            CriteriaResolver::new().with_custom_attributes(ElementKind::Entry, ["accentColor"]);
        assert!(resolver
            .resolve(params(json!({"accentColor": "#ff0000"})), ElementKind::Entry)
            .is_ok());
        assert!(resolver
            .resolve(params(json!({"accentColor": "#ff0000"})), ElementKind::Tag)
            .is_err());
    }

    #[test]
    fn resolution_is_deterministic() {
        let raw = json!({"title": {"like": "a%"}, "section": ["news", "blog"], "limit": 3});
        let a = resolve(params(raw.clone()), ElementKind::Entry).unwrap();
        let b = resolve(params(raw), ElementKind::Entry).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.cache_key(), b.cache_key());
        let attrs: Vec<_> = a.constraints().iter().map(|c| c.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["section", "title"]);
    }
}
