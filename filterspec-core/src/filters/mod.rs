//! Typed filter primitives.
//!
//! Each filter kind describes one rule for one model field:
//!
//! - [`ListFilter`] - membership in a list of values
//! - [`RangeFilter`] - lower and upper bounds
//! - [`StringFilter`] - exact, contains, starts-with or ends-with matching
//! - [`NullFilter`] - null / not-null checks only
//!
//! All kinds carry [`NullFlags`] and implement [`FilterCriteria`].

mod list;
mod nullable;
mod range;
mod string;

pub use list::ListFilter;
pub use nullable::{NullFilter, NullFlags, NullableFilter};
pub use range::RangeFilter;
pub use string::{StringFilter, StringMatch};

/// Common queries over a filter's state.
pub trait FilterCriteria {
    /// Whether the filter carries any rule: a value, a null check or a flag.
    fn has_value(&self) -> bool;

    /// Whether no concrete value is assigned.
    fn is_empty(&self) -> bool;

    /// Return the filter to its default, rule-free state.
    fn reset(&mut self);
}
