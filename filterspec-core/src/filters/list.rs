//! Membership filter over a list of values.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FilterCriteria, NullFlags, NullableFilter};
use crate::value::{FieldType, Scalar};

/// Matches model fields whose value is one of `values`.
///
/// An unassigned list carries no rule. An assigned but empty list is a
/// rule that matches nothing (or everything, when inverted).
///
/// ```rust
/// use filterspec_core::{FilterCriteria, ListFilter};
///
/// let filter = ListFilter::with_values([1, 2, 3]).inverted();
/// assert!(filter.has_value());
/// assert!(filter.is_inverted());
/// assert_eq!(filter.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListFilter<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    values: Option<Vec<T>>,
    #[serde(default)]
    is_inverted: bool,
    #[serde(flatten)]
    flags: NullFlags,
}

impl<T> Default for ListFilter<T> {
    fn default() -> Self {
        Self {
            values: None,
            is_inverted: false,
            flags: NullFlags::default(),
        }
    }
}

impl<T> ListFilter<T> {
    /// Create an unassigned list filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list filter from values.
    pub fn with_values(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: Some(values.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Negate the membership test.
    pub fn inverted(mut self) -> Self {
        self.is_inverted = true;
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

    /// Whether the membership test is negated.
    pub fn is_inverted(&self) -> bool {
        self.is_inverted
    }

    /// Set whether the membership test is negated.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.is_inverted = inverted;
    }

    /// The assigned values, if any.
    pub fn values(&self) -> Option<&[T]> {
        self.values.as_deref()
    }

    /// Add values, assigning the list if it was unassigned.
    pub fn add(&mut self, values: impl IntoIterator<Item = T>) {
        self.values.get_or_insert_with(Vec::new).extend(values);
    }

    /// Remove every occurrence of `value`. Returns true if anything was removed.
    pub fn remove(&mut self, value: &T) -> bool
    where
        T: PartialEq,
    {
        let values = self.values.get_or_insert_with(Vec::new);
        let before = values.len();
        values.retain(|v| v != value);
        values.len() != before
    }

    /// Remove all values but keep the list assigned.
    pub fn clear_values(&mut self) {
        if let Some(values) = self.values.as_mut() {
            values.clear();
        }
    }

    /// Number of assigned values.
    pub fn len(&self) -> usize {
        self.values.as_ref().map_or(0, Vec::len)
    }

    /// Iterate over the assigned values.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.as_deref().unwrap_or(&[]).iter()
    }

    /// Convert the values, keeping the flags.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> ListFilter<U> {
        ListFilter {
            values: self.values.as_ref().map(|v| v.iter().map(f).collect()),
            is_inverted: self.is_inverted,
            flags: self.flags,
        }
    }

    /// Type tag of the list elements.
    pub fn element_type(&self) -> FieldType
    where
        T: Scalar,
    {
        T::TYPE
    }
}

impl<T> NullableFilter for ListFilter<T> {
    fn null_flags(&self) -> &NullFlags {
        &self.flags
    }

    fn null_flags_mut(&mut self) -> &mut NullFlags {
        &mut self.flags
    }
}

impl<T> FilterCriteria for ListFilter<T> {
    fn has_value(&self) -> bool {
        self.flags.is_set() || self.values.is_some()
    }

    fn is_empty(&self) -> bool {
        self.values.as_ref().is_none_or(Vec::is_empty)
    }

    fn reset(&mut self) {
        self.values = None;
        self.is_inverted = false;
        self.flags.clear();
    }
}

impl<T> FromIterator<T> for ListFilter<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::with_values(iter)
    }
}

impl<'a, T> IntoIterator for &'a ListFilter<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Display> fmt::Display for ListFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("Empty");
        }
        let values = self
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "IsInverted: {}, IsNull: {}, IsNotNull: {}, Count: {}, Values: {}",
            self.is_inverted,
            self.flags.is_null(),
            self.flags.is_not_null(),
            self.len(),
            values
        )
    }
}
