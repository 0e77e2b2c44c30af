//! Storage collaborator contract and an in-memory implementation.

use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::RwLock;
use tracing::trace;

use crate::criteria::{Comparison, Constraint, Criteria, Direction};
use crate::element::Element;
use crate::error::{ElementsError, Result};
use crate::kind::ElementKind;

/// Executes resolved criteria against element storage.
///
/// Calls are blocking from the caller's point of view. `count` must ignore
/// the criteria's limit and offset.
pub trait ElementStore: Send + Sync + Debug {
    /// Matching elements, ordered and windowed.
    fn find(&self, kind: ElementKind, criteria: &Criteria) -> Result<Vec<Element>>;

    /// Number of matching elements, ignoring limit and offset.
    fn count(&self, kind: ElementKind, criteria: &Criteria) -> Result<u64>;
}

/// In-memory element store.
///
/// Evaluates criteria the way the SQL rendering would: `NULL` never equals,
/// orders, or is excluded by anything except `IS NULL`/`IS NOT NULL`. Elements
/// without an explicit order come back by ascending id. Every call is counted
/// so callers can check how often storage was hit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    elements: RwLock<Vec<Element>>,
    relations: RwLock<Vec<(u64, u64)>>,
    finds: AtomicUsize,
    counts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `elements`.
    pub fn with_elements(elements: impl IntoIterator<Item = Element>) -> Self {
        let store = Self::new();
        for element in elements {
            store.insert(element);
        }
        store
    }

    /// Insert or replace an element (matched by kind and id).
    pub fn insert(&self, element: Element) {
        let mut elements = write_lock(&self.elements);
        match elements
            .iter_mut()
            .find(|e| e.kind == element.kind && e.id == element.id)
        {
            Some(existing) => *existing = element,
            None => elements.push(element),
        }
    }

    /// Record a relation from `source` to `target`.
    pub fn relate(&self, source: u64, target: u64) {
        write_lock(&self.relations).push((source, target));
    }

    /// Number of `find` calls served.
    pub fn find_calls(&self) -> usize {
        self.finds.load(AtomicOrdering::SeqCst)
    }

    /// Number of `count` calls served.
    pub fn count_calls(&self) -> usize {
        self.counts.load(AtomicOrdering::SeqCst)
    }

    /// Total storage queries served.
    pub fn queries(&self) -> usize {
        self.find_calls() + self.count_calls()
    }

    fn matching(&self, kind: ElementKind, criteria: &Criteria) -> Result<Vec<Element>> {
        let elements = self
            .elements
            .read()
            .map_err(|_| ElementsError::Storage("element store lock poisoned".into()))?;
        let relations = self
            .relations
            .read()
            .map_err(|_| ElementsError::Storage("relation store lock poisoned".into()))?;

        let mut matched = Vec::new();
        for element in elements.iter().filter(|e| e.kind == kind) {
            if !related(element.id, criteria.related_to(), &relations) {
                continue;
            }
            let mut keep = true;
            for constraint in criteria.constraints() {
                if !matches_constraint(element, constraint)? {
                    keep = false;
                    break;
                }
            }
            if keep {
                matched.push(element.clone());
            }
        }
        Ok(matched)
    }
}

impl ElementStore for MemoryStore {
    fn find(&self, kind: ElementKind, criteria: &Criteria) -> Result<Vec<Element>> {
        self.finds.fetch_add(1, AtomicOrdering::SeqCst);
        let mut matched = self.matching(kind, criteria)?;

        matched.sort_by(|a, b| {
            for order in criteria.order_by() {
                let ordering = compare_nullable(
                    a.get(&order.attribute).as_ref(),
                    b.get(&order.attribute).as_ref(),
                );
                let ordering = match order.direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.id.cmp(&b.id)
        });

        let offset = criteria.offset().unwrap_or(0) as usize;
        let limit = criteria.limit().map_or(usize::MAX, |l| l as usize);
        let window: Vec<Element> = matched.into_iter().skip(offset).take(limit).collect();
        trace!(%kind, returned = window.len(), "memory store find");
        Ok(window)
    }

    fn count(&self, kind: ElementKind, criteria: &Criteria) -> Result<u64> {
        self.counts.fetch_add(1, AtomicOrdering::SeqCst);
        let total = self.matching(kind, criteria)?.len() as u64;
        trace!(%kind, total, "memory store count");
        Ok(total)
    }
}

fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn related(id: u64, targets: Option<&[u64]>, relations: &[(u64, u64)]) -> bool {
    let Some(targets) = targets else {
        return true;
    };
    relations.iter().any(|(source, target)| {
        (*source == id && targets.contains(target)) || (*target == id && targets.contains(source))
    })
}

fn is_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// SQL-like comparison of two non-null scalars; `None` when incomparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::String(y)) => x.as_f64()?.partial_cmp(&y.parse::<f64>().ok()?),
        (Value::String(x), Value::Number(y)) => x.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        _ => None,
    }
}

/// Ordering for sorting: nulls first, incomparable values equal.
fn compare_nullable(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (is_null(a), is_null(b)) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => match (a, b) {
            (Some(a), Some(b)) => compare_values(a, b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        },
    }
}

fn equals(a: &Value, b: &Value) -> bool {
    compare_values(a, b) == Some(Ordering::Equal)
}

fn like(value: &Value, pattern: &str) -> Result<bool> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Ok(false),
    };
    let mut regex = String::from("^");
    for ch in pattern.chars() {
        match ch {
            '%' => regex.push_str(".*"),
            '_' => regex.push('.'),
            other => regex.push_str(&regex::escape(&other.to_string())),
        }
    }
    regex.push('$');
    let compiled = RegexBuilder::new(&regex)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|e| ElementsError::invalid_operand("like", e.to_string()))?;
    Ok(compiled.is_match(&text))
}

fn matches_constraint(element: &Element, constraint: &Constraint) -> Result<bool> {
    let value = element.get(&constraint.attribute);
    let value = value.as_ref();

    if let Comparison::IsNull = constraint.comparison {
        return Ok(is_null(value));
    }
    if let Comparison::NotNull = constraint.comparison {
        return Ok(!is_null(value));
    }
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return Ok(false);
    };

    let ordered = |operand: &Value, accept: fn(Ordering) -> bool| {
        compare_values(value, operand).is_some_and(accept)
    };

    Ok(match &constraint.comparison {
        Comparison::Eq(operand) => equals(value, operand),
        Comparison::Ne(operand) => !equals(value, operand),
        Comparison::Gt(operand) => ordered(operand, |o| o == Ordering::Greater),
        Comparison::Gte(operand) => ordered(operand, |o| o != Ordering::Less),
        Comparison::Lt(operand) => ordered(operand, |o| o == Ordering::Less),
        Comparison::Lte(operand) => ordered(operand, |o| o != Ordering::Greater),
        Comparison::Like(pattern) => like(value, pattern)?,
        Comparison::In(list) => list.iter().any(|item| equals(value, item)),
        Comparison::NotIn(list) => !list.iter().any(|item| equals(value, item)),
        Comparison::IsNull => false,
        Comparison::NotNull => true,
    })
}
