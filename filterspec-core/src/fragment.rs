//! Backend fragment contract.
//!
//! A [`Fragment`] is an opaque predicate piece produced for one filter field.
//! The engine only needs a neutral element and AND; handlers additionally use
//! OR, NOT and the always-false fragment. A [`Backend`] builds the primitive
//! fragments the built-in handlers ask for.

use std::fmt;

use crate::error::SpecResult;
use crate::filters::StringMatch;
use crate::schema::{Model, ModelField};
use crate::value::FieldValue;

/// A composable backend predicate.
///
/// Implementations must honor these identities:
///
/// - `empty().and(x) == x` and `x.and(empty()) == x`
/// - `x.or(empty()) == empty()` (an unconstrained branch matches everything)
/// - `empty().not() == never()`
pub trait Fragment: Clone + fmt::Debug + Send + Sync + 'static {
    /// The neutral, always-true fragment.
    fn empty() -> Self;

    /// The always-false fragment.
    fn never() -> Self;

    /// Whether this is the neutral fragment.
    fn is_empty(&self) -> bool;

    /// Logical AND.
    fn and(self, other: Self) -> Self;

    /// Logical OR.
    fn or(self, other: Self) -> Self;

    /// Logical NOT.
    fn not(self) -> Self;

    /// AND every fragment together, starting from [`Fragment::empty`].
    fn all<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        fragments.into_iter().fold(Self::empty(), Self::and)
    }

    /// OR every fragment together. An empty iterator yields [`Fragment::never`].
    fn any<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        fragments
            .into_iter()
            .reduce(Self::or)
            .unwrap_or_else(Self::never)
    }
}

/// Ordering comparison used by range fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl Comparison {
    /// Lower bound comparison.
    pub fn lower(exclusive: bool) -> Self {
        if exclusive { Self::Gt } else { Self::Gte }
    }

    /// Upper bound comparison.
    pub fn upper(exclusive: bool) -> Self {
        if exclusive { Self::Lt } else { Self::Lte }
    }

    /// `Gt` or `Gte`.
    pub fn is_lower(&self) -> bool {
        matches!(self, Self::Gt | Self::Gte)
    }

    /// The SQL-style operator symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }

    /// Short name, as used by search range queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// Check whether `ordering` (model value compared to bound) satisfies this comparison.
    pub fn accepts(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Gt => ordering == Greater,
            Self::Gte => ordering != Less,
            Self::Lt => ordering == Less,
            Self::Lte => ordering != Greater,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Null-check direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullCheck {
    /// The model field is null.
    IsNull,
    /// The model field is not null.
    IsNotNull,
}

/// The model field a fragment targets, with its backend path.
pub struct FieldTarget<'a, M> {
    field: &'a ModelField<M>,
    path: &'a str,
}

impl<M> Clone for FieldTarget<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for FieldTarget<'_, M> {}

impl<M> fmt::Debug for FieldTarget<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTarget")
            .field("field", &self.field.name())
            .field("path", &self.path)
            .finish()
    }
}

impl<'a, M> FieldTarget<'a, M> {
    pub fn new(field: &'a ModelField<M>, path: &'a str) -> Self {
        Self { field, path }
    }

    /// The model field descriptor.
    pub fn field(&self) -> &'a ModelField<M> {
        self.field
    }

    /// The backend path, e.g. a column or index field name.
    pub fn path(&self) -> &'a str {
        self.path
    }
}

/// Builds primitive fragments for one model type.
pub trait Backend: Send + Sync + 'static {
    /// The model type fragments are evaluated against.
    type Model: Model;
    /// The fragment type produced.
    type Fragment: Fragment;

    /// Backend name used in diagnostics.
    fn name(&self) -> &'static str;

    /// The backend path for a model field.
    fn field_path(&self, field: &ModelField<Self::Model>) -> String {
        field.name().to_string()
    }

    /// `field == value`.
    fn equals(
        &self,
        target: FieldTarget<'_, Self::Model>,
        value: &FieldValue,
    ) -> SpecResult<Self::Fragment>;

    /// `field` is one of `values`. An empty slice never matches.
    fn one_of(
        &self,
        target: FieldTarget<'_, Self::Model>,
        values: &[FieldValue],
    ) -> SpecResult<Self::Fragment>;

    /// `field IS [NOT] NULL`.
    fn null_check(
        &self,
        target: FieldTarget<'_, Self::Model>,
        check: NullCheck,
    ) -> SpecResult<Self::Fragment>;

    /// `field <op> value`.
    fn compare(
        &self,
        target: FieldTarget<'_, Self::Model>,
        op: Comparison,
        value: &FieldValue,
    ) -> SpecResult<Self::Fragment>;

    /// String match on a text field.
    fn text(
        &self,
        target: FieldTarget<'_, Self::Model>,
        mode: StringMatch,
        value: &str,
    ) -> SpecResult<Self::Fragment>;
}
