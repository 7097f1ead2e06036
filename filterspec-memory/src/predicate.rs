//! Evaluable predicate tree over model values.

use std::fmt;

use filterspec_core::{Comparison, FieldValue, Fragment, Model, ModelField, StringMatch};

/// A predicate over one model type.
///
/// Leaves hold the model field descriptor they read, so a predicate can be
/// evaluated against any `&M` without further lookups.
pub enum Predicate<M> {
    /// Matches everything.
    Always,
    /// Matches nothing.
    Never,
    /// `field == value`.
    Eq {
        field: ModelField<M>,
        value: FieldValue,
    },
    /// `field` is one of `values`.
    In {
        field: ModelField<M>,
        values: Vec<FieldValue>,
    },
    /// `field` is null.
    IsNull(ModelField<M>),
    /// `field` is not null.
    IsNotNull(ModelField<M>),
    /// `field <op> value`.
    Cmp {
        field: ModelField<M>,
        op: Comparison,
        value: FieldValue,
    },
    /// String match. Null and non-string values never match.
    Text {
        field: ModelField<M>,
        mode: StringMatch,
        value: String,
        ignore_case: bool,
    },
    /// Logical AND.
    And(Vec<Predicate<M>>),
    /// Logical OR.
    Or(Vec<Predicate<M>>),
    /// Logical NOT.
    Not(Box<Predicate<M>>),
}

impl<M> Predicate<M> {
    /// Evaluate against one model.
    pub fn evaluate(&self, model: &M) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Eq { field, value } => field.get(model).loosely_equals(value),
            Self::In { field, values } => {
                let actual = field.get(model);
                values.iter().any(|v| actual.loosely_equals(v))
            }
            Self::IsNull(field) => field.get(model).is_null(),
            Self::IsNotNull(field) => !field.get(model).is_null(),
            Self::Cmp { field, op, value } => field
                .get(model)
                .compare(value)
                .is_some_and(|ordering| op.accepts(ordering)),
            Self::Text {
                field,
                mode,
                value,
                ignore_case,
            } => match field.get(model).as_str() {
                Some(actual) if *ignore_case => {
                    text_matches(*mode, &actual.to_lowercase(), &value.to_lowercase())
                }
                Some(actual) => text_matches(*mode, actual, value),
                None => false,
            },
            Self::And(predicates) => predicates.iter().all(|p| p.evaluate(model)),
            Self::Or(predicates) => predicates.iter().any(|p| p.evaluate(model)),
            Self::Not(predicate) => !predicate.evaluate(model),
        }
    }

    /// Lazily yield the items matching this predicate.
    pub fn filter<'a, I>(&'a self, items: I) -> impl Iterator<Item = &'a M> + 'a
    where
        I: IntoIterator<Item = &'a M>,
        I::IntoIter: 'a,
    {
        items.into_iter().filter(move |model| self.evaluate(model))
    }

    /// Number of leaf conditions.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Always | Self::Never => 0,
            Self::And(predicates) | Self::Or(predicates) => {
                predicates.iter().map(Predicate::leaf_count).sum()
            }
            Self::Not(predicate) => predicate.leaf_count(),
            _ => 1,
        }
    }
}

fn text_matches(mode: StringMatch, actual: &str, expected: &str) -> bool {
    match mode {
        StringMatch::Exact => actual == expected,
        StringMatch::Contains => actual.contains(expected),
        StringMatch::StartsWith => actual.starts_with(expected),
        StringMatch::EndsWith => actual.ends_with(expected),
    }
}

impl<M: Model> Fragment for Predicate<M> {
    fn empty() -> Self {
        Self::Always
    }

    fn never() -> Self {
        Self::Never
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Always)
    }

    fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Always, p) | (p, Self::Always) => p,
            (Self::Never, _) | (_, Self::Never) => Self::Never,
            (Self::And(mut left), Self::And(right)) => {
                left.extend(right);
                Self::And(left)
            }
            (Self::And(mut left), p) => {
                left.push(p);
                Self::And(left)
            }
            (p, q) => Self::And(vec![p, q]),
        }
    }

    fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::Always, _) | (_, Self::Always) => Self::Always,
            (Self::Never, p) | (p, Self::Never) => p,
            (Self::Or(mut left), Self::Or(right)) => {
                left.extend(right);
                Self::Or(left)
            }
            (Self::Or(mut left), p) => {
                left.push(p);
                Self::Or(left)
            }
            (p, q) => Self::Or(vec![p, q]),
        }
    }

    fn not(self) -> Self {
        match self {
            Self::Always => Self::Never,
            Self::Never => Self::Always,
            Self::Not(inner) => *inner,
            p => Self::Not(Box::new(p)),
        }
    }
}

impl<M> Clone for Predicate<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::Never => Self::Never,
            Self::Eq { field, value } => Self::Eq {
                field: field.clone(),
                value: value.clone(),
            },
            Self::In { field, values } => Self::In {
                field: field.clone(),
                values: values.clone(),
            },
            Self::IsNull(field) => Self::IsNull(field.clone()),
            Self::IsNotNull(field) => Self::IsNotNull(field.clone()),
            Self::Cmp { field, op, value } => Self::Cmp {
                field: field.clone(),
                op: *op,
                value: value.clone(),
            },
            Self::Text {
                field,
                mode,
                value,
                ignore_case,
            } => Self::Text {
                field: field.clone(),
                mode: *mode,
                value: value.clone(),
                ignore_case: *ignore_case,
            },
            Self::And(predicates) => Self::And(predicates.clone()),
            Self::Or(predicates) => Self::Or(predicates.clone()),
            Self::Not(predicate) => Self::Not(predicate.clone()),
        }
    }
}

impl<M> fmt::Display for Predicate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, predicates: &[Predicate<M>], sep: &str| {
            let parts = predicates.iter().map(ToString::to_string).collect::<Vec<_>>();
            write!(f, "({})", parts.join(sep))
        };

        match self {
            Self::Always => f.write_str("true"),
            Self::Never => f.write_str("false"),
            Self::Eq { field, value } => write!(f, "{} == {}", field.name(), value),
            Self::In { field, values } => {
                let values = values.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "{} in [{}]", field.name(), values.join(", "))
            }
            Self::IsNull(field) => write!(f, "{} is null", field.name()),
            Self::IsNotNull(field) => write!(f, "{} is not null", field.name()),
            Self::Cmp { field, op, value } => write!(f, "{} {} {}", field.name(), op, value),
            Self::Text {
                field,
                mode,
                value,
                ignore_case,
            } => {
                let op = match mode {
                    StringMatch::Exact => "==",
                    mode => mode.as_str(),
                };
                let suffix = if *ignore_case { " (ignore case)" } else { "" };
                write!(f, "{} {} {:?}{}", field.name(), op, value, suffix)
            }
            Self::And(predicates) => join(f, predicates, " && "),
            Self::Or(predicates) => join(f, predicates, " || "),
            Self::Not(predicate) => write!(f, "!({})", predicate),
        }
    }
}

impl<M> fmt::Debug for Predicate<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filterspec_core::{FieldType, model_schema};
    use pretty_assertions::assert_eq;

    struct Item {
        id: i64,
        name: String,
        note: Option<String>,
        price: f64,
    }

    model_schema!(Item { id, name, note, price });

    fn field(name: &str) -> ModelField<Item> {
        Item::model_fields()
            .into_iter()
            .find(|f| f.name() == name)
            .expect("field")
    }

    fn item(id: i64, name: &str, note: Option<&str>, price: f64) -> Item {
        Item {
            id,
            name: name.to_string(),
            note: note.map(str::to_string),
            price,
        }
    }

    #[test]
    fn test_eq_and_in() {
        let eq = Predicate::Eq {
            field: field("id"),
            value: FieldValue::Int(2),
        };
        assert!(eq.evaluate(&item(2, "a", None, 1.0)));
        assert!(!eq.evaluate(&item(3, "a", None, 1.0)));

        let within = Predicate::In {
            field: field("id"),
            values: vec![FieldValue::Int(1), FieldValue::Int(3)],
        };
        assert!(within.evaluate(&item(3, "a", None, 1.0)));
        assert_eq!(within.to_string(), "id in [1, 3]");
    }

    #[test]
    fn test_cmp_across_numeric_types() {
        let cheap = Predicate::Cmp {
            field: field("price"),
            op: Comparison::Lt,
            value: FieldValue::Int(10),
        };
        assert!(cheap.evaluate(&item(1, "a", None, 9.5)));
        assert!(!cheap.evaluate(&item(1, "a", None, 10.0)));
        assert_eq!(field("price").field_type(), FieldType::Float);
    }

    #[test]
    fn test_text_is_null_guarded() {
        let contains = Predicate::Text {
            field: field("note"),
            mode: StringMatch::Contains,
            value: "ab".into(),
            ignore_case: false,
        };
        assert!(!contains.evaluate(&item(1, "a", None, 1.0)));
        assert!(contains.evaluate(&item(1, "a", Some("xaby"), 1.0)));
        assert!(!contains.clone().not().evaluate(&item(1, "a", Some("xaby"), 1.0)));
    }

    #[test]
    fn test_text_ignore_case() {
        let starts = Predicate::Text {
            field: field("name"),
            mode: StringMatch::StartsWith,
            value: "AL".into(),
            ignore_case: true,
        };
        assert!(starts.evaluate(&item(1, "alice", None, 1.0)));
        assert_eq!(starts.to_string(), "name starts_with \"AL\" (ignore case)");
    }

    #[test]
    fn test_combinators_flatten_and_simplify() {
        let a = Predicate::IsNull(field("note"));
        let b = Predicate::IsNotNull(field("name"));
        let c = Predicate::Eq {
            field: field("id"),
            value: FieldValue::Int(1),
        };

        let all = Predicate::all([a.clone(), b.clone(), c]);
        assert_eq!(all.to_string(), "(note is null && name is not null && id == 1)");
        assert_eq!(all.leaf_count(), 3);

        assert!(!Predicate::<Item>::any(Vec::new()).evaluate(&item(1, "a", None, 1.0)));
        assert_eq!(a.clone().or(Predicate::Always).to_string(), "true");
        assert_eq!(a.clone().and(Predicate::Never).to_string(), "false");
        assert_eq!(b.not().not().to_string(), "name is not null");
    }

    #[test]
    fn test_filter_iterator() {
        let items = vec![
            item(1, "alpha", None, 5.0),
            item(2, "beta", Some("x"), 15.0),
            item(3, "gamma", None, 25.0),
        ];
        let expensive = Predicate::Cmp {
            field: field("price"),
            op: Comparison::Gte,
            value: FieldValue::Float(15.0),
        };

        let ids: Vec<i64> = expensive.filter(&items).map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
