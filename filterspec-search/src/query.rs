//! Search query documents.
//!
//! [`SearchQuery`] is a small tree mirroring the query DSL of
//! Elasticsearch-compatible engines. It serializes to the JSON body the
//! engine expects, e.g. `{"term":{"status":"open"}}`.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Value, json};

use filterspec_core::{Comparison, FieldValue, Fragment};

/// A leaf query on one index field.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafQuery {
    /// Exact value.
    Term { field: String, value: FieldValue },
    /// Any of several exact values.
    Terms { field: String, values: Vec<FieldValue> },
    /// One or more bounds on the same field.
    Range {
        field: String,
        bounds: Vec<(Comparison, FieldValue)>,
    },
    /// `*` / `?` pattern on a keyword field.
    Wildcard {
        field: String,
        pattern: String,
        case_insensitive: bool,
    },
    /// Analyzed full-text match.
    Match { field: String, text: String },
    /// Analyzed phrase match.
    MatchPhrase { field: String, text: String },
    /// The field has a value.
    Exists { field: String },
}

impl LeafQuery {
    /// The index field this leaf targets.
    pub fn field(&self) -> &str {
        match self {
            Self::Term { field, .. }
            | Self::Terms { field, .. }
            | Self::Range { field, .. }
            | Self::Wildcard { field, .. }
            | Self::Match { field, .. }
            | Self::MatchPhrase { field, .. }
            | Self::Exists { field } => field,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Term { field, value } => json!({ "term": { field: value } }),
            Self::Terms { field, values } => json!({ "terms": { field: values } }),
            Self::Range { field, bounds } => {
                let bounds = bounds
                    .iter()
                    .map(|(op, value)| (op.as_str().to_string(), json!(value)))
                    .collect::<serde_json::Map<_, _>>();
                json!({ "range": { field: bounds } })
            }
            Self::Wildcard {
                field,
                pattern,
                case_insensitive,
            } => {
                if *case_insensitive {
                    json!({ "wildcard": { field: { "value": pattern, "case_insensitive": true } } })
                } else {
                    json!({ "wildcard": { field: { "value": pattern } } })
                }
            }
            Self::Match { field, text } => json!({ "match": { field: text } }),
            Self::MatchPhrase { field, text } => json!({ "match_phrase": { field: text } }),
            Self::Exists { field } => json!({ "exists": { "field": field } }),
        }
    }
}

/// Boolean composition of queries. Empty clauses are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoolQuery {
    pub must: Vec<SearchQuery>,
    pub must_not: Vec<SearchQuery>,
    pub should: Vec<SearchQuery>,
    /// Like `must`, but in filter context: no scoring.
    pub filter: Vec<SearchQuery>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: SearchQuery) -> Self {
        self.must.push(query);
        self
    }

    pub fn must_not(mut self, query: SearchQuery) -> Self {
        self.must_not.push(query);
        self
    }

    pub fn should(mut self, query: SearchQuery) -> Self {
        self.should.push(query);
        self
    }

    pub fn filter(mut self, query: SearchQuery) -> Self {
        self.filter.push(query);
        self
    }

    /// Every clause is conjunctive: no `should` clauses.
    fn is_conjunctive(&self) -> bool {
        self.should.is_empty()
    }

    /// Only `should` clauses.
    fn is_disjunctive(&self) -> bool {
        self.must.is_empty() && self.must_not.is_empty() && self.filter.is_empty()
    }

    fn merge(&mut self, other: BoolQuery) {
        self.must.extend(other.must);
        self.must_not.extend(other.must_not);
        self.should.extend(other.should);
        self.filter.extend(other.filter);
    }

    pub fn to_json(&self) -> Value {
        let mut clauses = serde_json::Map::new();
        for (name, queries) in [
            ("must", &self.must),
            ("must_not", &self.must_not),
            ("should", &self.should),
            ("filter", &self.filter),
        ] {
            if !queries.is_empty() {
                let queries = queries.iter().map(SearchQuery::to_json).collect();
                clauses.insert(name.to_string(), Value::Array(queries));
            }
        }
        json!({ "bool": clauses })
    }
}

/// A search query document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchQuery {
    /// Matches every document.
    #[default]
    MatchAll,
    /// Matches no document.
    MatchNone,
    Leaf(LeafQuery),
    Bool(BoolQuery),
}

impl SearchQuery {
    pub fn term(field: impl Into<String>, value: FieldValue) -> Self {
        Self::Leaf(LeafQuery::Term {
            field: field.into(),
            value,
        })
    }

    /// A `terms` query; a single value collapses to `term`.
    pub fn terms(field: impl Into<String>, mut values: Vec<FieldValue>) -> Self {
        if values.len() == 1 {
            if let Some(value) = values.pop() {
                return Self::term(field, value);
            }
        }
        Self::Leaf(LeafQuery::Terms {
            field: field.into(),
            values,
        })
    }

    pub fn range(field: impl Into<String>, op: Comparison, value: FieldValue) -> Self {
        Self::Leaf(LeafQuery::Range {
            field: field.into(),
            bounds: vec![(op, value)],
        })
    }

    pub fn wildcard(field: impl Into<String>, pattern: impl Into<String>, case_insensitive: bool) -> Self {
        Self::Leaf(LeafQuery::Wildcard {
            field: field.into(),
            pattern: pattern.into(),
            case_insensitive,
        })
    }

    pub fn match_text(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Leaf(LeafQuery::Match {
            field: field.into(),
            text: text.into(),
        })
    }

    pub fn match_phrase(field: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Leaf(LeafQuery::MatchPhrase {
            field: field.into(),
            text: text.into(),
        })
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Self::Leaf(LeafQuery::Exists { field: field.into() })
    }

    /// Wrap in a `bool` filter clause, dropping relevance scoring.
    pub fn into_filter_context(self) -> Self {
        match self {
            Self::MatchAll | Self::MatchNone => self,
            query => Self::Bool(BoolQuery::new().filter(query)),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::MatchAll => json!({ "match_all": {} }),
            Self::MatchNone => json!({ "match_none": {} }),
            Self::Leaf(leaf) => leaf.to_json(),
            Self::Bool(query) => query.to_json(),
        }
    }

    /// The full request body: `{"query": ...}`.
    pub fn to_request_body(&self) -> Value {
        json!({ "query": self.to_json() })
    }
}

impl Serialize for SearchQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Two bound lists fit in one `range` object: at most one lower and one upper
/// bound in total, since each operator is a JSON key.
fn bounds_compose(left: &[(Comparison, FieldValue)], right: &[(Comparison, FieldValue)]) -> bool {
    let lower = left.iter().chain(right).filter(|(op, _)| op.is_lower()).count();
    let upper = left.len() + right.len() - lower;
    lower <= 1 && upper <= 1
}

impl Fragment for SearchQuery {
    fn empty() -> Self {
        Self::MatchAll
    }

    fn never() -> Self {
        Self::MatchNone
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::MatchAll)
    }

    fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::MatchAll, q) | (q, Self::MatchAll) => q,
            (Self::MatchNone, _) | (_, Self::MatchNone) => Self::MatchNone,
            (
                Self::Leaf(LeafQuery::Range { field, mut bounds }),
                Self::Leaf(LeafQuery::Range {
                    field: other_field,
                    bounds: other_bounds,
                }),
            ) if field == other_field && bounds_compose(&bounds, &other_bounds) => {
                bounds.extend(other_bounds);
                Self::Leaf(LeafQuery::Range { field, bounds })
            }
            (Self::Bool(mut left), Self::Bool(right))
                if left.is_conjunctive() && right.is_conjunctive() =>
            {
                left.merge(right);
                Self::Bool(left)
            }
            (Self::Bool(left), q) if left.is_conjunctive() => Self::Bool(left.must(q)),
            (q, Self::Bool(mut right)) if right.is_conjunctive() => {
                right.must.insert(0, q);
                Self::Bool(right)
            }
            (q, r) => Self::Bool(BoolQuery::new().must(q).must(r)),
        }
    }

    fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::MatchAll, _) | (_, Self::MatchAll) => Self::MatchAll,
            (Self::MatchNone, q) | (q, Self::MatchNone) => q,
            (Self::Bool(mut left), Self::Bool(right))
                if left.is_disjunctive() && right.is_disjunctive() =>
            {
                left.merge(right);
                Self::Bool(left)
            }
            (Self::Bool(left), q) if left.is_disjunctive() => Self::Bool(left.should(q)),
            (q, Self::Bool(mut right)) if right.is_disjunctive() => {
                right.should.insert(0, q);
                Self::Bool(right)
            }
            (q, r) => Self::Bool(BoolQuery::new().should(q).should(r)),
        }
    }

    fn not(self) -> Self {
        match self {
            Self::MatchAll => Self::MatchNone,
            Self::MatchNone => Self::MatchAll,
            Self::Bool(mut query)
                if query.must_not.len() == 1
                    && query.must.is_empty()
                    && query.should.is_empty()
                    && query.filter.is_empty() =>
            {
                query.must_not.pop().unwrap_or(Self::MatchNone)
            }
            q => Self::Bool(BoolQuery::new().must_not(q)),
        }
    }
}
