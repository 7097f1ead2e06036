//! Range filter over comparable values.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FilterCriteria, NullFlags, NullableFilter};
use crate::value::{FieldType, Scalar};

/// Matches model fields between `start` and `end`.
///
/// Bounds are inclusive unless `is_exclusive` is set. With
/// `use_start_as_equals`, `start` is compared for equality and `end` is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<T>,
    #[serde(default)]
    is_exclusive: bool,
    #[serde(default)]
    use_start_as_equals: bool,
    #[serde(flatten)]
    flags: NullFlags,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            is_exclusive: false,
            use_start_as_equals: false,
            flags: NullFlags::default(),
        }
    }
}

impl<T> RangeFilter<T> {
    /// Create an open range.
    pub fn new() -> Self {
        Self::default()
    }

    /// Range with both bounds.
    pub fn between(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    /// Range with a lower bound only.
    pub fn starting_at(start: T) -> Self {
        Self {
            start: Some(start),
            ..Self::default()
        }
    }

    /// Range with an upper bound only.
    pub fn until(end: T) -> Self {
        Self {
            end: Some(end),
            ..Self::default()
        }
    }

    /// Equality on `value`.
    pub fn equal_to(value: T) -> Self {
        Self {
            start: Some(value),
            use_start_as_equals: true,
            ..Self::default()
        }
    }

    /// Make both bounds exclusive.
    pub fn exclusive(mut self) -> Self {
        self.is_exclusive = true;
        self
    }

    /// Treat `start` as an equality constant.
    pub fn start_as_equals(mut self) -> Self {
        self.use_start_as_equals = true;
        self
    }

    /// Require the model field to be null.
    pub fn null(mut self) -> Self {
        self.flags.set_null(true);
        self
    }

    /// Require the model field to be non-null.
    pub fn not_null(mut self) -> Self {
        self.flags.set_not_null(true);
        self
    }

    pub fn start(&self) -> Option<&T> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&T> {
        self.end.as_ref()
    }

    pub fn set_start(&mut self, start: Option<T>) {
        self.start = start;
    }

    pub fn set_end(&mut self, end: Option<T>) {
        self.end = end;
    }

    pub fn is_exclusive(&self) -> bool {
        self.is_exclusive
    }

    pub fn set_exclusive(&mut self, exclusive: bool) {
        self.is_exclusive = exclusive;
    }

    pub fn use_start_as_equals(&self) -> bool {
        self.use_start_as_equals
    }

    pub fn set_use_start_as_equals(&mut self, value: bool) {
        self.use_start_as_equals = value;
    }

    /// Convert the bounds, keeping the flags.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> RangeFilter<U> {
        RangeFilter {
            start: self.start.as_ref().map(&mut f),
            end: self.end.as_ref().map(&mut f),
            is_exclusive: self.is_exclusive,
            use_start_as_equals: self.use_start_as_equals,
            flags: self.flags,
        }
    }

    /// Type tag of the bounds.
    pub fn element_type(&self) -> FieldType
    where
        T: Scalar,
    {
        T::TYPE
    }
}

impl<T> NullableFilter for RangeFilter<T> {
    fn null_flags(&self) -> &NullFlags {
        &self.flags
    }

    fn null_flags_mut(&mut self) -> &mut NullFlags {
        &mut self.flags
    }
}

impl<T> FilterCriteria for RangeFilter<T> {
    fn has_value(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.flags.is_set()
    }

    fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl<T: fmt::Display> fmt::Display for RangeFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("Empty");
        }
        let bound = |b: &Option<T>| b.as_ref().map(ToString::to_string).unwrap_or_default();
        write!(
            f,
            "Start: {}, End: {}, IsExclusive: {}, UseStartAsEquals: {}, IsNull: {}, IsNotNull: {}",
            bound(&self.start),
            bound(&self.end),
            self.is_exclusive,
            self.use_start_as_equals,
            self.flags.is_null(),
            self.flags.is_not_null()
        )
    }
}
