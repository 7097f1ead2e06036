//! String matching filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{FilterCriteria, NullFlags, NullableFilter};

/// How a [`StringFilter`] value is matched against the model field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringMatch {
    /// Whole-value equality.
    #[default]
    Exact,
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
}

impl StringMatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Contains => "contains",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
        }
    }
}

impl fmt::Display for StringMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Matches string model fields.
///
/// ```rust
/// use filterspec_core::{FilterCriteria, StringFilter, StringMatch};
///
/// let filter = StringFilter::contains("ab").inverted();
/// assert_eq!(filter.mode(), StringMatch::Contains);
/// assert!(filter.has_value());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(default)]
    mode: StringMatch,
    #[serde(default)]
    is_inverted: bool,
    #[serde(flatten)]
    flags: NullFlags,
}

impl StringFilter {
    /// Create an empty string filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on `value`.
    pub fn exact(value: impl Into<String>) -> Self {
        Self::with_mode(value, StringMatch::Exact)
    }

    /// Substring match on `value`.
    pub fn contains(value: impl Into<String>) -> Self {
        Self::with_mode(value, StringMatch::Contains)
    }

    /// Prefix match on `value`.
    pub fn starts_with(value: impl Into<String>) -> Self {
        Self::with_mode(value, StringMatch::StartsWith)
    }

    /// Suffix match on `value`.
    pub fn ends_with(value: impl Into<String>) -> Self {
        Self::with_mode(value, StringMatch::EndsWith)
    }

    /// Match `value` using `mode`.
    pub fn with_mode(value: impl Into<String>, mode: StringMatch) -> Self {
        Self {
            value: Some(value.into()),
            mode,
            ..Self::default()
        }
    }

    /// Negate the match.
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

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    pub fn mode(&self) -> StringMatch {
        self.mode
    }

    pub fn set_mode(&mut self, mode: StringMatch) {
        self.mode = mode;
    }

    pub fn is_inverted(&self) -> bool {
        self.is_inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.is_inverted = inverted;
    }
}

impl NullableFilter for StringFilter {
    fn null_flags(&self) -> &NullFlags {
        &self.flags
    }

    fn null_flags_mut(&mut self) -> &mut NullFlags {
        &mut self.flags
    }
}

impl FilterCriteria for StringFilter {
    fn has_value(&self) -> bool {
        self.flags.is_set() || !self.is_empty()
    }

    fn is_empty(&self) -> bool {
        self.value.as_deref().is_none_or(str::is_empty)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl From<&str> for StringFilter {
    fn from(value: &str) -> Self {
        Self::exact(value)
    }
}

impl From<String> for StringFilter {
    fn from(value: String) -> Self {
        Self::exact(value)
    }
}

impl fmt::Display for StringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("Empty");
        }
        write!(
            f,
            "IsInverted: {}, Mode: {}, IsNotNull: {}, IsNull: {}, Value: {}",
            self.is_inverted,
            self.mode,
            self.flags.is_not_null(),
            self.flags.is_null(),
            self.value.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_string_is_empty() {
        let filter = StringFilter::exact("");
        assert!(filter.is_empty());
        assert!(!filter.has_value());
    }

    #[test]
    fn test_null_flag_without_value() {
        let filter = StringFilter::new().null();
        assert!(filter.has_value());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_mode_constructors() {
        assert_eq!(StringFilter::starts_with("a").mode(), StringMatch::StartsWith);
        assert_eq!(StringFilter::ends_with("a").mode(), StringMatch::EndsWith);
        assert_eq!(StringFilter::from("a").mode(), StringMatch::Exact);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = StringFilter::contains("ab");
        let mut copy = original.clone();
        copy.set_value(Some("cd".into()));
        copy.set_inverted(true);

        assert_eq!(original.value(), Some("ab"));
        assert!(!original.is_inverted());
    }

    #[test]
    fn test_reset() {
        let mut filter = StringFilter::contains("ab").inverted().not_null();
        filter.reset();
        assert_eq!(filter, StringFilter::new());
    }

    #[test]
    fn test_serde() {
        let filter: StringFilter =
            serde_json::from_str(r#"{"value": "ab", "mode": "contains", "is_not_null": true}"#)
                .unwrap();
        assert_eq!(filter, StringFilter::contains("ab").not_null());
    }

    #[test]
    fn test_display() {
        assert_eq!(StringFilter::new().to_string(), "Empty");
        assert_eq!(
            StringFilter::contains("ab").to_string(),
            "IsInverted: false, Mode: contains, IsNotNull: false, IsNull: false, Value: ab"
        );
    }
}
