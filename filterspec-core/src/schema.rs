//! Field descriptor tables for filter and model types.
//!
//! A filter type lists its fields once through [`FilterSchema`], a model type
//! through [`Model`]. Each descriptor carries the field name, its type tag and
//! an accessor, so the specification engine can enumerate and read fields
//! without runtime reflection. The [`filter_schema!`](crate::filter_schema)
//! and [`model_schema!`](crate::model_schema) macros generate both tables.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::filters::{
    FilterCriteria, ListFilter, NullFilter, NullFlags, NullableFilter, RangeFilter, StringFilter,
};
use crate::value::{FieldType, FieldValue, Scalar};

/// The closed set of filter value kinds the handlers dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// A plain scalar.
    Constant,
    /// A plain sequence of scalars.
    Sequence,
    /// A [`ListFilter`].
    List,
    /// A [`RangeFilter`].
    Range,
    /// A [`StringFilter`].
    String,
    /// A [`NullFilter`].
    Nullable,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constant => "constant",
            Self::Sequence => "sequence",
            Self::List => "list",
            Self::Range => "range",
            Self::String => "string",
            Self::Nullable => "nullable",
        }
    }

    /// Whether values of this kind carry null-check flags.
    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::List | Self::Range | Self::String | Self::Nullable)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A filter field's runtime value with its element type erased to [`FieldValue`].
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// A plain scalar, compared for equality.
    Constant(FieldValue),
    /// A plain sequence, compared for membership.
    Sequence {
        element_type: FieldType,
        values: Vec<FieldValue>,
    },
    /// A list filter.
    List {
        element_type: FieldType,
        filter: ListFilter<FieldValue>,
    },
    /// A range filter.
    Range {
        element_type: FieldType,
        filter: RangeFilter<FieldValue>,
    },
    /// A string filter.
    String(StringFilter),
    /// A null-check-only filter.
    Nullable(NullFilter),
}

impl FilterValue {
    /// Wrap a scalar.
    pub fn constant(value: impl Into<FieldValue>) -> Self {
        Self::Constant(value.into())
    }

    /// Erase a typed sequence.
    pub fn sequence<T: Scalar>(values: &[T]) -> Self {
        Self::Sequence {
            element_type: T::TYPE,
            values: values.iter().map(Scalar::to_field_value).collect(),
        }
    }

    /// Erase a typed list filter.
    pub fn list<T: Scalar>(filter: &ListFilter<T>) -> Self {
        Self::List {
            element_type: T::TYPE,
            filter: filter.map(Scalar::to_field_value),
        }
    }

    /// Erase a typed range filter.
    pub fn range<T: Scalar>(filter: &RangeFilter<T>) -> Self {
        Self::Range {
            element_type: T::TYPE,
            filter: filter.map(Scalar::to_field_value),
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            Self::Constant(_) => FilterKind::Constant,
            Self::Sequence { .. } => FilterKind::Sequence,
            Self::List { .. } => FilterKind::List,
            Self::Range { .. } => FilterKind::Range,
            Self::String(_) => FilterKind::String,
            Self::Nullable(_) => FilterKind::Nullable,
        }
    }

    /// Type tag compared against the model field.
    ///
    /// Sequences and lists report their element type. Null filters and
    /// null constants have none.
    pub fn element_type(&self) -> Option<FieldType> {
        match self {
            Self::Constant(value) => value.field_type(),
            Self::Sequence { element_type, .. }
            | Self::List { element_type, .. }
            | Self::Range { element_type, .. } => Some(*element_type),
            Self::String(_) => Some(FieldType::String),
            Self::Nullable(_) => None,
        }
    }

    /// Null-check flags, for kinds that carry them.
    pub fn null_flags(&self) -> Option<&NullFlags> {
        match self {
            Self::Constant(_) | Self::Sequence { .. } => None,
            Self::List { filter, .. } => Some(filter.null_flags()),
            Self::Range { filter, .. } => Some(filter.null_flags()),
            Self::String(filter) => Some(filter.null_flags()),
            Self::Nullable(filter) => Some(filter.null_flags()),
        }
    }

    /// Whether this value means "no constraint" and is skipped entirely.
    ///
    /// Null constants, empty strings and empty plain sequences are absent.
    /// Filter wrappers are never absent; their handlers decide.
    pub fn is_absent(&self) -> bool {
        match self {
            Self::Constant(FieldValue::Null) => true,
            Self::Constant(FieldValue::String(s)) => s.is_empty(),
            Self::Sequence { values, .. } => values.is_empty(),
            _ => false,
        }
    }

    /// Whether the value carries any filtering rule.
    pub fn has_value(&self) -> bool {
        match self {
            Self::Constant(_) | Self::Sequence { .. } => !self.is_absent(),
            Self::List { filter, .. } => filter.has_value(),
            Self::Range { filter, .. } => filter.has_value(),
            Self::String(filter) => filter.has_value(),
            Self::Nullable(filter) => filter.has_value(),
        }
    }

    /// Runtime values that disagree with the declared element type.
    pub(crate) fn mismatched_value(&self) -> Option<&FieldValue> {
        let declared = self.element_type()?;
        let wrong = |v: &&FieldValue| v.field_type().is_some_and(|t| !t.is_assignable_to(declared));
        match self {
            Self::Sequence { values, .. } => values.iter().find(wrong),
            Self::List { filter, .. } => filter.iter().find(wrong),
            Self::Range { filter, .. } => filter.start().into_iter().chain(filter.end()).find(wrong),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "{}", value),
            Self::Sequence { values, .. } => {
                let values = values.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "[{}]", values.join(", "))
            }
            Self::List { filter, .. } => write!(f, "{}", filter),
            Self::Range { filter, .. } => write!(f, "{}", filter),
            Self::String(filter) => write!(f, "{}", filter),
            Self::Nullable(filter) => write!(f, "{}", filter),
        }
    }
}

/// A Rust type usable as a filter field.
///
/// Implemented for supported scalars, `Vec` of scalars, every filter kind,
/// and `Option` of any of these.
pub trait FilterFieldValue {
    /// The kind dispatched on by the handlers.
    const KIND: FilterKind;

    /// The declared element type, `None` for null filters.
    fn element_type() -> Option<FieldType>;

    /// Erase the value. `None` means the field is unset.
    fn to_filter_value(&self) -> Option<FilterValue>;
}

macro_rules! impl_constant_filter_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FilterFieldValue for $ty {
                const KIND: FilterKind = FilterKind::Constant;

                fn element_type() -> Option<FieldType> {
                    Some(<$ty as Scalar>::TYPE)
                }

                fn to_filter_value(&self) -> Option<FilterValue> {
                    Some(FilterValue::Constant(Scalar::to_field_value(self)))
                }
            }
        )*
    };
}

impl_constant_filter_field!(bool, i32, i64, u32, f64, String, DateTime<Utc>, Uuid);

impl<T: Scalar> FilterFieldValue for Vec<T> {
    const KIND: FilterKind = FilterKind::Sequence;

    fn element_type() -> Option<FieldType> {
        Some(T::TYPE)
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        Some(FilterValue::sequence(self))
    }
}

impl<T: Scalar> FilterFieldValue for ListFilter<T> {
    const KIND: FilterKind = FilterKind::List;

    fn element_type() -> Option<FieldType> {
        Some(T::TYPE)
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        Some(FilterValue::list(self))
    }
}

impl<T: Scalar> FilterFieldValue for RangeFilter<T> {
    const KIND: FilterKind = FilterKind::Range;

    fn element_type() -> Option<FieldType> {
        Some(T::TYPE)
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        Some(FilterValue::range(self))
    }
}

impl FilterFieldValue for StringFilter {
    const KIND: FilterKind = FilterKind::String;

    fn element_type() -> Option<FieldType> {
        Some(FieldType::String)
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        Some(FilterValue::String(self.clone()))
    }
}

impl FilterFieldValue for NullFilter {
    const KIND: FilterKind = FilterKind::Nullable;

    fn element_type() -> Option<FieldType> {
        None
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        Some(FilterValue::Nullable(*self))
    }
}

impl<T: FilterFieldValue> FilterFieldValue for Option<T> {
    const KIND: FilterKind = T::KIND;

    fn element_type() -> Option<FieldType> {
        T::element_type()
    }

    fn to_filter_value(&self) -> Option<FilterValue> {
        self.as_ref().and_then(T::to_filter_value)
    }
}

type FilterAccessor<F> = Arc<dyn Fn(&F) -> Option<FilterValue> + Send + Sync>;

/// Descriptor of one filter field.
pub struct FilterField<F> {
    name: &'static str,
    kind: FilterKind,
    element_type: Option<FieldType>,
    accessor: FilterAccessor<F>,
}

impl<F> FilterField<F> {
    /// Describe a field read through `get`.
    ///
    /// ```rust
    /// use filterspec_core::{FilterField, FilterKind, ListFilter};
    ///
    /// #[derive(Default)]
    /// struct UserFilter {
    ///     ids: ListFilter<i64>,
    /// }
    ///
    /// let field = FilterField::of("ids", |f: &UserFilter| &f.ids);
    /// assert_eq!(field.kind(), FilterKind::List);
    /// ```
    pub fn of<V>(name: &'static str, get: fn(&F) -> &V) -> Self
    where
        V: FilterFieldValue + 'static,
        F: 'static,
    {
        Self {
            name,
            kind: V::KIND,
            element_type: V::element_type(),
            accessor: Arc::new(move |filter: &F| get(filter).to_filter_value()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn element_type(&self) -> Option<FieldType> {
        self.element_type
    }

    /// Read this field from a filter instance.
    pub fn value(&self, filter: &F) -> Option<FilterValue> {
        (self.accessor)(filter)
    }
}

impl<F> Clone for FilterField<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            element_type: self.element_type,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<F> fmt::Debug for FilterField<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterField")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("element_type", &self.element_type)
            .finish()
    }
}

/// A filter DTO with a static field table.
pub trait FilterSchema: Default + Send + Sync + 'static {
    /// Display name used in diagnostics.
    fn filter_name() -> &'static str;

    /// Fields in declaration order.
    fn filter_fields() -> Vec<FilterField<Self>>;
}

/// A Rust type usable as a model field.
pub trait ModelValue {
    /// The field's type tag.
    const TYPE: FieldType;
    /// Whether the field can hold null.
    const NULLABLE: bool;

    fn to_field_value(&self) -> FieldValue;
}

macro_rules! impl_model_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ModelValue for $ty {
                const TYPE: FieldType = <$ty as Scalar>::TYPE;
                const NULLABLE: bool = false;

                fn to_field_value(&self) -> FieldValue {
                    Scalar::to_field_value(self)
                }
            }

            impl ModelValue for Option<$ty> {
                const TYPE: FieldType = <$ty as Scalar>::TYPE;
                const NULLABLE: bool = true;

                fn to_field_value(&self) -> FieldValue {
                    self.as_ref().map_or(FieldValue::Null, Scalar::to_field_value)
                }
            }
        )*
    };
}

impl_model_value!(bool, i32, i64, u32, f64, String, DateTime<Utc>, Uuid);

type ModelAccessor<M> = Arc<dyn Fn(&M) -> FieldValue + Send + Sync>;

/// Descriptor of one model field.
pub struct ModelField<M> {
    name: &'static str,
    field_type: FieldType,
    nullable: bool,
    full_text: bool,
    accessor: ModelAccessor<M>,
}

impl<M> ModelField<M> {
    /// Describe a field read through `get`.
    pub fn of<V>(name: &'static str, get: fn(&M) -> &V) -> Self
    where
        V: ModelValue + 'static,
        M: 'static,
    {
        Self {
            name,
            field_type: V::TYPE,
            nullable: V::NULLABLE,
            full_text: false,
            accessor: Arc::new(move |model: &M| get(model).to_field_value()),
        }
    }

    /// Describe a computed field.
    pub fn computed(
        name: &'static str,
        field_type: FieldType,
        nullable: bool,
        get: impl Fn(&M) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            field_type,
            nullable,
            full_text: false,
            accessor: Arc::new(get),
        }
    }

    /// Mark the field as analyzed full-text.
    pub fn full_text(mut self) -> Self {
        self.full_text = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_full_text(&self) -> bool {
        self.full_text
    }

    /// Read this field from a model instance.
    pub fn get(&self, model: &M) -> FieldValue {
        (self.accessor)(model)
    }
}

impl<M> Clone for ModelField<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            field_type: self.field_type,
            nullable: self.nullable,
            full_text: self.full_text,
            accessor: Arc::clone(&self.accessor),
        }
    }
}

impl<M> fmt::Debug for ModelField<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelField")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("nullable", &self.nullable)
            .field("full_text", &self.full_text)
            .finish()
    }
}

/// A model entity with a static field table.
pub trait Model: Send + Sync + 'static {
    /// Display name used in diagnostics.
    fn model_name() -> &'static str;

    /// Fields in declaration order.
    fn model_fields() -> Vec<ModelField<Self>>
    where
        Self: Sized;
}
