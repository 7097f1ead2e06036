//! Null-check flags shared by every filter kind.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FilterCriteria;

/// Mutually exclusive `is_null` / `is_not_null` flags.
///
/// Setting one flag clears the other, so both are never true at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawNullFlags")]
pub struct NullFlags {
    is_null: bool,
    is_not_null: bool,
}

#[derive(Deserialize)]
struct RawNullFlags {
    #[serde(default)]
    is_null: bool,
    #[serde(default)]
    is_not_null: bool,
}

impl From<RawNullFlags> for NullFlags {
    fn from(raw: RawNullFlags) -> Self {
        let mut flags = Self::default();
        flags.set_not_null(raw.is_not_null);
        // is_null is applied last and wins on conflicting input
        flags.set_null(raw.is_null);
        flags
    }
}

impl NullFlags {
    /// Flags requiring the model field to be null.
    pub fn null() -> Self {
        Self {
            is_null: true,
            is_not_null: false,
        }
    }

    /// Flags requiring the model field to be non-null.
    pub fn not_null() -> Self {
        Self {
            is_null: false,
            is_not_null: true,
        }
    }

    /// Whether the model field must be null.
    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Whether the model field must be non-null.
    pub fn is_not_null(&self) -> bool {
        self.is_not_null
    }

    /// Set the null flag. Setting it clears `is_not_null`.
    pub fn set_null(&mut self, value: bool) {
        self.is_null = value;
        if value {
            self.is_not_null = false;
        }
    }

    /// Set the not-null flag. Setting it clears `is_null`.
    pub fn set_not_null(&mut self, value: bool) {
        self.is_not_null = value;
        if value {
            self.is_null = false;
        }
    }

    /// Whether either flag is set.
    pub fn is_set(&self) -> bool {
        self.is_null || self.is_not_null
    }

    /// Clear both flags.
    pub fn clear(&mut self) {
        self.is_null = false;
        self.is_not_null = false;
    }
}

/// Capability shared by all filter kinds that can request a null check.
pub trait NullableFilter {
    /// Borrow the null flags.
    fn null_flags(&self) -> &NullFlags;

    /// Mutably borrow the null flags.
    fn null_flags_mut(&mut self) -> &mut NullFlags;

    /// Whether the model field must be null.
    fn is_null(&self) -> bool {
        self.null_flags().is_null()
    }

    /// Whether the model field must be non-null.
    fn is_not_null(&self) -> bool {
        self.null_flags().is_not_null()
    }

    /// Set the null flag, clearing the not-null flag.
    fn set_null(&mut self, value: bool) {
        self.null_flags_mut().set_null(value);
    }

    /// Set the not-null flag, clearing the null flag.
    fn set_not_null(&mut self, value: bool) {
        self.null_flags_mut().set_not_null(value);
    }
}

/// A filter that only carries a null check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NullFilter {
    #[serde(flatten)]
    flags: NullFlags,
}

impl NullFilter {
    /// Create an empty null filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// A filter matching null model fields.
    pub fn null() -> Self {
        Self {
            flags: NullFlags::null(),
        }
    }

    /// A filter matching non-null model fields.
    pub fn not_null() -> Self {
        Self {
            flags: NullFlags::not_null(),
        }
    }
}

impl NullableFilter for NullFilter {
    fn null_flags(&self) -> &NullFlags {
        &self.flags
    }

    fn null_flags_mut(&mut self) -> &mut NullFlags {
        &mut self.flags
    }
}

impl FilterCriteria for NullFilter {
    fn has_value(&self) -> bool {
        self.flags.is_set()
    }

    fn is_empty(&self) -> bool {
        !self.flags.is_set()
    }

    fn reset(&mut self) {
        self.flags.clear();
    }
}

impl fmt::Display for NullFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("Empty");
        }
        write!(
            f,
            "IsNull: {}, IsNotNull: {}",
            self.flags.is_null(),
            self.flags.is_not_null()
        )
    }
}
